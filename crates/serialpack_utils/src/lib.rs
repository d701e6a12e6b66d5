pub mod chunk_name;
pub mod concat_string;
pub mod indexmap;
pub mod rayon;
pub mod xxhash;
