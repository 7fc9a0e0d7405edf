pub mod number_list;
pub mod random;

pub use number_list::{format_number_list, parse_number_list};
pub use random::{random_element, random_int, uniform_u32};
