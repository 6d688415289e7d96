pub mod entity;
pub mod mapper;
pub mod memory_repo;
pub mod migrations;
pub mod sea_orm_repo;

#[cfg(test)]
mod mapper_test;

pub use memory_repo::InMemoryMappingRepository;
pub use sea_orm_repo::SeaOrmMappingRepository;
