use anyhow::{anyhow, Context as _, Result};
use rand::distr::{Alphanumeric, SampleString as _};
use rand::{rng, Rng};
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::tokio::fs::{create_dir_all, remove_file};
use std::io::ErrorKind;
use std::path::Path;

const IMAGE_DIR: &str = "images";

/// Raster formats a venue image may have and the extension each is
/// stored under. Uploads are served from this site, so nothing that
/// can carry script (SVG, HTML) is accepted.
const ACCEPTED_IMAGES: [(ContentType, &str); 4] = [
    (ContentType::PNG, "png"),
    (ContentType::JPEG, "jpg"),
    (ContentType::GIF, "gif"),
    (ContentType::WEBP, "webp"),
];

/// The extension to store an upload of this type under,
/// or `None` if the type isn't accepted.
pub(crate) fn image_extension(content_type: Option<&ContentType>) -> Option<&'static str> {
    let content_type = content_type?;
    ACCEPTED_IMAGES
        .iter()
        .find(|(accepted, _)| {
            accepted.top() == content_type.top() && accepted.sub() == content_type.sub()
        })
        .map(|(_, extension)| *extension)
}

/// Copies an uploaded image into the media directory under a fresh name.
/// Returns the stored path relative to the media directory.
pub(crate) async fn store_image(file: &mut TempFile<'_>, media_dir: &Path) -> Result<String> {
    let extension = image_extension(file.content_type())
        .ok_or_else(|| anyhow!("refusing to store an image of type {:?}", file.content_type()))?;
    let relative_path = image_path(&mut rng(), extension);
    let target = media_dir.join(&relative_path);
    if let Some(parent) = target.parent() {
        create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    file.copy_to(&target)
        .await
        .with_context(|| format!("failed to store uploaded image at {}", target.display()))?;
    Ok(relative_path)
}

/// Deletes a stored image. An image that is already gone is fine.
pub(crate) async fn remove_image(media_dir: &Path, relative_path: &str) -> Result<()> {
    match remove_file(media_dir.join(relative_path)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove image {relative_path}")),
    }
}

fn image_path<R: Rng>(rng: &mut R, extension: &str) -> String {
    let stem = Alphanumeric.sample_string(rng, 16);
    format!("{IMAGE_DIR}/{stem}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng as _;

    #[test]
    fn image_paths_live_in_the_image_directory() {
        let path = image_path(&mut SmallRng::seed_from_u64(1), "png");
        assert!(path.starts_with("images/"));
        assert!(path.ends_with(".png"));
        assert_eq!("images/".len() + 16 + ".png".len(), path.len());
    }

    #[test]
    fn accepts_raster_images() {
        assert_eq!(Some("png"), image_extension(Some(&ContentType::PNG)));
        assert_eq!(Some("jpg"), image_extension(Some(&ContentType::JPEG)));
        assert_eq!(Some("gif"), image_extension(Some(&ContentType::GIF)));
        assert_eq!(Some("webp"), image_extension(Some(&ContentType::WEBP)));
        assert_eq!(Some("png"), image_extension(Some(&ContentType::new("IMAGE", "PNG"))));
    }

    #[test]
    fn rejects_svg_and_other_types() {
        assert_eq!(None, image_extension(Some(&ContentType::SVG)));
        assert_eq!(None, image_extension(Some(&ContentType::new("image", "svg+xml"))));
        assert_eq!(None, image_extension(Some(&ContentType::HTML)));
        assert_eq!(None, image_extension(Some(&ContentType::new("image", "x-icon"))));
        assert_eq!(None, image_extension(None));
    }

    #[rocket::async_test]
    async fn removing_an_image_deletes_the_file() {
        let media_dir = std::env::temp_dir().join(format!(
            "club-calendar-media-{}",
            Alphanumeric.sample_string(&mut rng(), 12)
        ));
        std::fs::create_dir_all(media_dir.join(IMAGE_DIR)).unwrap();
        let path = image_path(&mut rng(), "png");
        std::fs::write(media_dir.join(&path), b"not really a png").unwrap();

        remove_image(&media_dir, &path).await.unwrap();

        assert!(!media_dir.join(&path).exists());
    }

    #[rocket::async_test]
    async fn removing_a_missing_image_is_fine() {
        let media_dir = std::env::temp_dir();
        remove_image(&media_dir, "images/does-not-exist.png").await.unwrap();
    }
}
