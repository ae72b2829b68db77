pub mod test_exploration;
