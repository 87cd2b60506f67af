pub mod winnow;
