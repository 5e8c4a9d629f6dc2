pub mod clustering;
pub mod marker_extraction;
pub mod pose_client;
