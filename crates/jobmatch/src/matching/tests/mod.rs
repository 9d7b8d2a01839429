mod common;
mod topsis;
