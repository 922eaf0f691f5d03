pub mod eligibility;
pub mod health;
pub mod orders;
