//! Repository layer over the team-membership schema

pub mod invite_repository;
pub mod join_request_repository;
pub mod member_repository;
pub mod team_repository;
pub mod user_repository;

pub use invite_repository::InviteRepository;
pub use join_request_repository::JoinRequestRepository;
pub use member_repository::MemberRepository;
pub use team_repository::TeamRepository;
pub use user_repository::UserRepository;
