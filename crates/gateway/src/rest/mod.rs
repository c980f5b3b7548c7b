pub mod health;
pub mod invites;
pub mod join_requests;
pub mod teams;
pub mod users;
