pub mod health;
pub mod netlify;
pub mod submissions;
