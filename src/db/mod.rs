pub mod csv_file;
pub mod postgres;
pub mod source;
pub mod store;

pub use csv_file::CsvSource;
pub use postgres::PostgresSource;
pub use source::{load_ratings, RatingSource, SampleSource};
pub use store::{RatingStore, UserRatings};
