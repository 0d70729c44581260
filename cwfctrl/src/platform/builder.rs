use clap::{ArgAction, Parser};
use cwfcore::{
    ac::user::DEFAULT_ADMIN_USER_TYPES,
    clock::{
        Clock,
        SystemClock,
    },
    event::{
        LogNotifier,
        Notifier,
    },
    platform::{
        ConnectorOption,
        WorkflowPlatform,
    },
    workflow::machine::EmptyChainPolicy,
};
use cwfdb::Backend;
use cwfrbac::{
    Builder as CwfRbacBuilder,
    ResolverCache,
};
use std::sync::Arc;

use crate::error::Error;
use super::{
    Platform,
    Settings,
};

/// Configures and builds the [`Platform`].
///
/// Every setting may be provided through the command line or the
/// environment when parsed by clap; the collaborators that cannot be
/// expressed as arguments are supplied through the chained setters.
#[derive(Clone, Parser)]
pub struct Builder {
    #[clap(long, value_name = "CWF_DB_URL", env = "CWF_DB_URL", default_value = "")]
    pub cwf_db_url: String,
    #[clap(
        long,
        value_name = "CWF_AUTO_CREATE_DB",
        env = "CWF_AUTO_CREATE_DB",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub cwf_auto_create_db: bool,
    #[clap(
        long,
        value_name = "CWF_EMPTY_CHAIN",
        env = "CWF_EMPTY_CHAIN",
        default_value_t = EmptyChainPolicy::AutoApprove,
    )]
    pub cwf_empty_chain: EmptyChainPolicy,
    #[clap(
        long,
        value_name = "CWF_ADMIN_USER_TYPES",
        env = "CWF_ADMIN_USER_TYPES",
        value_delimiter = ',',
        default_values_t = DEFAULT_ADMIN_USER_TYPES.map(String::from),
    )]
    pub cwf_admin_user_types: Vec<String>,
    #[clap(
        long,
        value_name = "CWF_REJECT_COMMENT_REQUIRED",
        env = "CWF_REJECT_COMMENT_REQUIRED",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub cwf_reject_comment_required: bool,
    #[clap(
        long,
        value_name = "CWF_CANCEL_COMMENT_REQUIRED",
        env = "CWF_CANCEL_COMMENT_REQUIRED",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub cwf_cancel_comment_required: bool,

    #[clap(skip)]
    platform: Option<Arc<dyn WorkflowPlatform>>,
    #[clap(skip)]
    notifier: Option<Arc<dyn Notifier>>,
    #[clap(skip)]
    clock: Option<Arc<dyn Clock>>,
}

impl Default for Builder {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            cwf_db_url: String::new(),
            cwf_auto_create_db: true,
            cwf_empty_chain: settings.empty_chain,
            cwf_admin_user_types: DEFAULT_ADMIN_USER_TYPES.map(String::from).into(),
            cwf_reject_comment_required: settings.reject_comment_required,
            cwf_cancel_comment_required: settings.cancel_comment_required,
            platform: None,
            notifier: None,
            clock: None,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cwf_db_url(mut self, value: String) -> Self {
        self.cwf_db_url = value;
        self
    }

    pub fn cwf_auto_create_db(mut self, value: bool) -> Self {
        self.cwf_auto_create_db = value;
        self
    }

    pub fn cwf_empty_chain(mut self, value: EmptyChainPolicy) -> Self {
        self.cwf_empty_chain = value;
        self
    }

    pub fn cwf_admin_user_types<I, S>(mut self, value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cwf_admin_user_types = value.into_iter()
            .map(Into::into)
            .collect();
        self
    }

    pub fn cwf_reject_comment_required(mut self, value: bool) -> Self {
        self.cwf_reject_comment_required = value;
        self
    }

    pub fn cwf_cancel_comment_required(mut self, value: bool) -> Self {
        self.cwf_cancel_comment_required = value;
        self
    }

    /// Use an already connected store in place of connecting to the
    /// database url.
    pub fn platform(mut self, value: impl WorkflowPlatform + 'static) -> Self {
        self.platform = Some(Arc::new(value));
        self
    }

    pub fn arc_platform(mut self, value: Arc<dyn WorkflowPlatform>) -> Self {
        self.platform = Some(value);
        self
    }

    pub fn notifier(mut self, value: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(value);
        self
    }

    pub fn clock(mut self, value: Arc<dyn Clock>) -> Self {
        self.clock = Some(value);
        self
    }

    pub fn settings(&self) -> Settings {
        Settings {
            empty_chain: self.cwf_empty_chain,
            reject_comment_required: self.cwf_reject_comment_required,
            cancel_comment_required: self.cwf_cancel_comment_required,
        }
    }

    pub async fn build(self) -> Result<Platform, Error> {
        let gate = CwfRbacBuilder::new()
            .admin_user_types(self.cwf_admin_user_types.iter().cloned())
            .build()?;
        let settings = self.settings();
        let db = match self.platform {
            Some(platform) => platform,
            None => Backend::wf(
                ConnectorOption::from(&self.cwf_db_url)
                    .auto_create_db(self.cwf_auto_create_db)
            )
                .await
                .map_err(|e| Error::StoreUnavailable(e.to_string()))?,
        };
        log::debug!("workflow platform ready with {settings:?}");
        Ok(Platform {
            db,
            gate,
            cache: Arc::new(ResolverCache::new()),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            settings,
        })
    }
}
