// Hybrid recommendation scoring over the content and collaborative spaces.

pub mod hybrid;
