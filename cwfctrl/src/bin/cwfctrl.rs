use clap::{
    Parser,
    Subcommand,
};
use cwfcore::{
    ac::Authority,
    workflow::{
        ActionType,
        Decision,
    },
};
use cwfctrl::platform::{
    Builder,
    Platform,
};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    builder: Builder,
    /// Print records as JSON
    #[clap(long, action)]
    json: bool,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(arg_required_else_help = true)]
    User {
        #[command(subcommand)]
        cmd: UserCmd,
    },
    #[command(arg_required_else_help = true)]
    Group {
        #[command(subcommand)]
        cmd: GroupCmd,
    },
    #[command(arg_required_else_help = true)]
    Resource {
        #[command(subcommand)]
        cmd: ResourceCmd,
    },
    #[command(arg_required_else_help = true)]
    Mapping {
        #[command(subcommand)]
        cmd: MappingCmd,
    },
    #[command(arg_required_else_help = true)]
    Workflow {
        #[command(subcommand)]
        cmd: WorkflowCmd,
    },
}

#[derive(Debug, Subcommand)]
enum UserCmd {
    #[command(arg_required_else_help = true)]
    Create {
        name: String,
        #[clap(long, default_value = "member")]
        user_type: String,
        #[clap(long)]
        email: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Status {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
enum GroupCmd {
    #[command(arg_required_else_help = true)]
    Create {
        name: String,
        #[clap(long)]
        email: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    AddMember {
        group: String,
        user: String,
    },
    #[command(arg_required_else_help = true)]
    RemoveMember {
        group: String,
        user: String,
    },
    #[command(arg_required_else_help = true)]
    Show {
        group: String,
    },
}

#[derive(Debug, Subcommand)]
enum ResourceCmd {
    #[command(arg_required_else_help = true)]
    Create {
        name: String,
        #[clap(long)]
        parent: Option<i64>,
    },
    #[command(arg_required_else_help = true)]
    Show {
        id: i64,
    },
    #[command(arg_required_else_help = true)]
    Grant {
        resource_id: i64,
        group: String,
        authority: Authority,
    },
    #[command(arg_required_else_help = true)]
    Revoke {
        resource_id: i64,
        group: String,
    },
    #[command(arg_required_else_help = true)]
    Resolve {
        resource_id: i64,
        group: String,
    },
}

#[derive(Debug, Subcommand)]
enum MappingCmd {
    #[command(arg_required_else_help = true)]
    Set {
        action: ActionType,
        groups: Vec<String>,
    },
    #[command(arg_required_else_help = true)]
    Show {
        action: ActionType,
    },
}

#[derive(Debug, Subcommand)]
enum WorkflowCmd {
    #[command(arg_required_else_help = true)]
    Submit {
        resource_id: i64,
        action: ActionType,
        user: String,
        #[clap(long, short = 'm')]
        comment: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Approve {
        task_id: i64,
        user: String,
        #[clap(long, short = 'm')]
        comment: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Reject {
        task_id: i64,
        user: String,
        #[clap(long, short = 'm')]
        comment: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Cancel {
        instance_id: i64,
        user: String,
        #[clap(long, short = 'm')]
        comment: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Show {
        instance_id: i64,
        #[clap(long, short = 'c', action)]
        comments: bool,
    },
    #[command(arg_required_else_help = true)]
    Pending {
        user: String,
    },
}

#[async_std::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("cwfctrl")
        .module("cwfdb_sqlite")
        .module("cwfrbac")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap();

    let platform = args.builder.build().await?;
    let json = args.json;

    match args.command {
        Commands::User { cmd } => {
            parse_user(&platform, cmd, json).await?;
        },
        Commands::Group { cmd } => {
            parse_group(&platform, cmd, json).await?;
        },
        Commands::Resource { cmd } => {
            parse_resource(&platform, cmd, json).await?;
        },
        Commands::Mapping { cmd } => {
            parse_mapping(&platform, cmd).await?;
        },
        Commands::Workflow { cmd } => {
            parse_workflow(&platform, cmd, json).await?;
        },
    }

    Ok(())
}

async fn user_id(platform: &Platform, name: &str) -> anyhow::Result<i64> {
    Ok(platform.get_user_by_name(name).await?.id)
}

async fn group_id(platform: &Platform, name: &str) -> anyhow::Result<i64> {
    Ok(platform.get_group_by_name(name).await?.id)
}

async fn parse_user(
    platform: &Platform,
    arg: UserCmd,
    json: bool,
) -> anyhow::Result<()> {
    match arg {
        UserCmd::Create { name, user_type, email } => {
            let user = platform.add_user(&name, email.as_deref(), &user_type).await?;
            println!("created user {name:?} with id {}", user.id);
        }
        UserCmd::Status { name } => {
            let user = platform.get_user_by_name(&name).await?;
            let groups = platform.list_groups_for_user(user.id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("user {} (id {}), type {}", user.name, user.id, user.user_type);
                if platform.is_admin(&user) {
                    println!("global workflow administrator");
                }
                for group in groups {
                    println!("member of {} (id {})", group.name, group.id);
                }
            }
        }
    }
    Ok(())
}

async fn parse_group(
    platform: &Platform,
    arg: GroupCmd,
    json: bool,
) -> anyhow::Result<()> {
    match arg {
        GroupCmd::Create { name, email } => {
            let group = platform.add_group(&name, email.as_deref()).await?;
            println!("created group {name:?} with id {}", group.id);
        }
        GroupCmd::AddMember { group, user } => {
            let group_id = group_id(platform, &group).await?;
            let user_id = user_id(platform, &user).await?;
            if platform.add_group_member(group_id, user_id).await? {
                println!("added {user} to {group}");
            } else {
                println!("{user} is already a member of {group}");
            }
        }
        GroupCmd::RemoveMember { group, user } => {
            let group_id = group_id(platform, &group).await?;
            let user_id = user_id(platform, &user).await?;
            if platform.remove_group_member(group_id, user_id).await? {
                println!("removed {user} from {group}");
            } else {
                println!("{user} is not a member of {group}");
            }
        }
        GroupCmd::Show { group } => {
            let group = platform.get_group_by_name(&group).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&group)?);
            } else {
                println!("{} (id {}): {}", group.name, group.id, group.users_summary());
                for permission in platform.list_permissions_for_group(group.id).await? {
                    println!("  {} on resource {}", permission.authority, permission.resource_id);
                }
            }
        }
    }
    Ok(())
}

async fn parse_resource(
    platform: &Platform,
    arg: ResourceCmd,
    json: bool,
) -> anyhow::Result<()> {
    match arg {
        ResourceCmd::Create { name, parent } => {
            let resource = platform.add_resource(&name, parent).await?;
            println!("created resource {name:?} with id {}", resource.id);
        }
        ResourceCmd::Show { id } => {
            let ancestry = platform.get_ancestry(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ancestry)?);
            } else {
                let path = ancestry.iter()
                    .rev()
                    .map(|resource| resource.name.as_str())
                    .collect::<Vec<_>>()
                    .join("/");
                println!("{path} (id {id})");
                for permission in platform.list_permissions_for_resource(id).await? {
                    let group = platform.get_group(permission.group_id).await?;
                    println!("  {}: {}", group.name, permission.authority);
                }
                println!("{}", platform.resource_summary(id, false).await?);
            }
        }
        ResourceCmd::Grant { resource_id, group, authority } => {
            let group_id = group_id(platform, &group).await?;
            platform.set_permission(resource_id, group_id, authority).await?;
            println!("granted {authority} on resource {resource_id} to {group}");
        }
        ResourceCmd::Revoke { resource_id, group } => {
            let group_id = group_id(platform, &group).await?;
            if platform.remove_permission(resource_id, group_id).await? {
                println!("revoked the entry on resource {resource_id} for {group}");
            } else {
                println!("{group} has no entry on resource {resource_id}");
            }
        }
        ResourceCmd::Resolve { resource_id, group } => {
            let group_id = group_id(platform, &group).await?;
            let resolution = platform.resolve_with_source(resource_id, group_id).await?;
            match resolution.source {
                Some(source) => println!("{} (from resource {source})", resolution.authority),
                None => println!("{}", resolution.authority),
            }
        }
    }
    Ok(())
}

async fn parse_mapping(
    platform: &Platform,
    arg: MappingCmd,
) -> anyhow::Result<()> {
    match arg {
        MappingCmd::Set { action, groups } => {
            let mut group_ids = Vec::new();
            for group in groups.iter() {
                group_ids.push(group_id(platform, group).await?);
            }
            platform.set_approver_mapping(action, &group_ids).await?;
            println!("{action} now requires: {}", groups.join(", "));
        }
        MappingCmd::Show { action } => {
            for (index, id) in platform.get_approver_mapping(action).await?
                .into_iter()
                .enumerate()
            {
                let group = platform.get_group(id).await?;
                println!("{index}: {} (id {id})", group.name);
            }
        }
    }
    Ok(())
}

async fn parse_workflow(
    platform: &Platform,
    arg: WorkflowCmd,
    json: bool,
) -> anyhow::Result<()> {
    match arg {
        WorkflowCmd::Submit { resource_id, action, user, comment } => {
            let user_id = user_id(platform, &user).await?;
            let id = platform.submit_action(
                resource_id,
                action,
                user_id,
                comment.as_deref(),
            ).await?;
            let instance = platform.get_instance(id).await?;
            println!("submitted workflow instance {id}: {}", instance.status);
        }
        WorkflowCmd::Approve { task_id, user, comment } => {
            let user_id = user_id(platform, &user).await?;
            let status = platform.act_on_task(
                task_id,
                user_id,
                Decision::Approve,
                comment.as_deref(),
            ).await?;
            println!("approved task {task_id}; workflow is {status}");
        }
        WorkflowCmd::Reject { task_id, user, comment } => {
            let user_id = user_id(platform, &user).await?;
            let status = platform.act_on_task(
                task_id,
                user_id,
                Decision::Reject,
                comment.as_deref(),
            ).await?;
            println!("rejected task {task_id}; workflow is {status}");
        }
        WorkflowCmd::Cancel { instance_id, user, comment } => {
            let user_id = user_id(platform, &user).await?;
            let status = platform.cancel_instance(
                instance_id,
                user_id,
                comment.as_deref(),
            ).await?;
            println!("workflow instance {instance_id} is {status}");
        }
        WorkflowCmd::Show { instance_id, comments } => {
            if json {
                let instance = platform.get_instance(instance_id).await?;
                println!("{}", serde_json::to_string_pretty(&instance)?);
            } else {
                println!("{}", platform.instance_summary(instance_id, comments).await?);
            }
        }
        WorkflowCmd::Pending { user } => {
            let user_id = user_id(platform, &user).await?;
            let tasks = platform.list_pending_tasks_for(user_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("no tasks pending for {user}");
            } else {
                for task in tasks.iter() {
                    let group = platform.get_group(task.group_id).await?;
                    println!(
                        "task {} of workflow instance {} for {}",
                        task.id,
                        task.workflow_instance_id,
                        group.name,
                    );
                }
            }
        }
    }
    Ok(())
}
