pub mod a001_cake;
pub mod p900_sales;
