pub mod common;
pub mod pagination;
pub mod nav_item;

pub mod account;
pub mod announcement;
pub mod attendance;
pub mod cleaning;
pub mod dashboard;
pub mod maintenance;
pub mod notification;
pub mod payment;
pub mod room;
pub mod system_log;
pub mod task;
pub mod user;
