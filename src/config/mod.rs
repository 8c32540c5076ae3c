pub mod load;
pub mod types;

pub use types::{
    Config, DEFAULT_AUDIO_FOLDER, DEFAULT_PHOTO_FOLDER, DEFAULT_VIDEO_FOLDER, FileTypeTable,
    ImportOptions, MediaCategory, Settings,
};
