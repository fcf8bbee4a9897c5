//! Media file storage shared by create and update

use platform::storage::UploadStore;

use crate::application::config::ArticleConfig;
use crate::application::form::UploadedFile;
use crate::domain::entity::media_file::MediaFile;
use crate::domain::value_object::{SectionId, UserId};
use crate::error::ArticleResult;

/// Write each file to disk and build its row, positions counting up from
/// `first_position`. Already written files are removed if one write fails.
pub(crate) async fn store_files(
    store: &UploadStore,
    config: &ArticleConfig,
    user_id: &UserId,
    targets: Vec<(SectionId, &UploadedFile)>,
    first_position: i32,
) -> ArticleResult<Vec<MediaFile>> {
    let dir = config.media_dir(user_id);
    let mut stored: Vec<MediaFile> = Vec::with_capacity(targets.len());

    for (offset, (section_id, file)) in targets.into_iter().enumerate() {
        let name = file.file_name.as_deref().unwrap_or_default();
        match store.save(&dir, name, &file.bytes).await {
            Ok(saved) => stored.push(MediaFile::new(
                *user_id,
                section_id,
                first_position + offset as i32,
                saved.src,
            )),
            Err(e) => {
                for file in &stored {
                    store.remove(&file.src).await;
                }
                return Err(e.into());
            }
        }
    }

    Ok(stored)
}
