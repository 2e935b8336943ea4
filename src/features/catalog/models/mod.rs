mod category;
mod customer;
mod order;
mod product;

pub use category::{Category, CreateCategory};
pub use customer::{CorrectCustomer, CreateCustomer, Customer};
pub use order::{CreateOrder, CreateOrderItem, Order, OrderDetail, OrderItem};
pub use product::{CreateProduct, Product};
