pub mod business;
pub mod product;
pub mod sale;
pub mod user;

pub use business::{Business, BusinessUpdate, NewBusiness};
pub use product::{NewProduct, Product, ProductUpdate};
pub use sale::{
    BusinessSale, BusinessSaleUpdate, NewBusinessSale, NewSale, Sale, SaleInfo, SaleUpdate,
};
pub use user::{LoginData, RegisterData, User, UserUpdate};
