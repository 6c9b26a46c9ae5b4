pub use super::lfg::Entity as Lfg;
