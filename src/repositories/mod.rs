pub mod customer;

#[cfg(test)]
pub mod memory;
