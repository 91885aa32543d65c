pub mod accounts;
pub mod cart;
pub mod domain;
pub mod memory;
pub mod orders;
pub mod ports;
pub mod validate;

pub use accounts::Accounts;
pub use cart::CartManager;
pub use domain::{Cart, CartLine, Item, Order, OrderLine, User, UserCredentials};
pub use memory::InMemoryStore;
pub use orders::Orders;
pub use ports::{CredentialHasher, PortError, PortResult, StoreService};
