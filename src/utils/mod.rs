pub mod fixed_array;
