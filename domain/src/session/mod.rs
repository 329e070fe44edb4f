//! Role-tagged messages exchanged with the generation backend

pub mod entities;
