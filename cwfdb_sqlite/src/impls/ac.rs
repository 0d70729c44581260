mod group;
mod permission;
mod user;
