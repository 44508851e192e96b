pub mod db;
pub mod entities;
pub mod registration;
pub mod services;
