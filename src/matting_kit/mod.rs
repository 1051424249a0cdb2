pub mod chroma_distance;
pub mod color;
pub mod composite;
pub mod external;
pub mod hsv_key;
pub mod refine;
pub mod triangulation;
