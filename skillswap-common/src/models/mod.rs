pub mod notification;
pub mod skill;
pub mod swap_request;
pub mod user;
pub mod user_profile;
