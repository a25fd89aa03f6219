mod api_tests;
mod lending_tests;
mod postgres_tests;
