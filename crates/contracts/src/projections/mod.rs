pub mod p900_sales;
