pub mod seaorm;

pub use seaorm::SeaOrmSalesRepository;
