pub mod use_children;
pub mod use_points;
pub mod use_profile;
pub mod use_staff;
