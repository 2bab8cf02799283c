pub mod answer;
pub mod company;
pub mod notification;
pub mod participant;
pub mod question;
pub mod quiz;
pub mod record;
pub mod user;
