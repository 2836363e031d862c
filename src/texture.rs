use crate::error::{Error, Result};
use gl::types::{GLenum, GLint, GLuint};
use stb_image::image::{self, Image, LoadResult};
use std::path::Path;

pub struct Texture {
    id: GLuint,
    target: GLenum,
}

impl Texture {
    pub fn new(target: GLenum) -> Result<Self> {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        if id != 0 {
            Ok(Self { id, target })
        } else {
            Err(Error::GlObjectAllocation("texture"))
        }
    }

    /// 1x1 RGB texture, used where a material has no map of its own.
    pub fn solid_color(rgb: [u8; 3]) -> Result<Self> {
        let tex = Self::new(gl::TEXTURE_2D)?;
        tex.bind();
        tex.image_2d(gl::TEXTURE_2D, (1, 1), gl::RGB, &rgb);
        tex.parameter(gl::TEXTURE_WRAP_S, gl::REPEAT);
        tex.parameter(gl::TEXTURE_WRAP_T, gl::REPEAT);
        tex.parameter(gl::TEXTURE_MIN_FILTER, gl::NEAREST);
        tex.parameter(gl::TEXTURE_MAG_FILTER, gl::NEAREST);
        Ok(tex)
    }

    pub fn bind(&self) {
        unsafe { gl::BindTexture(self.target, self.id) };
    }

    pub fn bind_to_unit(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(self.target, self.id);
        }
    }

    pub fn parameter(&self, pname: GLenum, param: GLenum) {
        unsafe { gl::TexParameteri(self.target, pname, param as GLint) };
    }

    pub fn generate_mipmaps(&self) {
        unsafe { gl::GenerateMipmap(self.target) };
    }

    /// Uploads tightly packed `u8` pixels into `face` (the texture's own
    /// target for 2D textures, a `TEXTURE_CUBE_MAP_*` face for cubemaps).
    fn image_2d(&self, face: GLenum, size: (usize, usize), format: GLenum, data: &[u8]) {
        unsafe {
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                face,
                0,
                format as GLint,
                size.0 as i32,
                size.1 as i32,
                0,
                format,
                gl::UNSIGNED_BYTE,
                data.as_ptr().cast(),
            );
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 4);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.id) };
    }
}

/// Loads a repeating, mipmapped 2D texture in the image's own channel layout.
pub fn load_texture_2d(path: &Path) -> Result<Texture> {
    let img = decode(path, 0)?;
    let format = pixel_format(img.depth).ok_or_else(|| Error::UnsupportedChannels {
        path: path.to_path_buf(),
        channels: img.depth,
    })?;

    let tex = Texture::new(gl::TEXTURE_2D)?;
    tex.bind();
    tex.image_2d(gl::TEXTURE_2D, (img.width, img.height), format, &img.data);
    tex.generate_mipmaps();
    tex.parameter(gl::TEXTURE_WRAP_S, gl::REPEAT);
    tex.parameter(gl::TEXTURE_WRAP_T, gl::REPEAT);
    tex.parameter(gl::TEXTURE_MIN_FILTER, gl::LINEAR_MIPMAP_LINEAR);
    tex.parameter(gl::TEXTURE_MAG_FILTER, gl::LINEAR);

    log::info!(
        "loaded texture {} ({}x{}, {} channels)",
        path.display(),
        img.width,
        img.height,
        img.depth
    );
    Ok(tex)
}

/// Loads a cubemap from six faces ordered +X, -X, +Y, -Y, +Z, -Z.
pub fn load_cubemap<P: AsRef<Path>>(faces: &[P; 6]) -> Result<Texture> {
    let tex = Texture::new(gl::TEXTURE_CUBE_MAP)?;
    tex.bind();

    for (i, face) in faces.iter().enumerate() {
        let path = face.as_ref();
        let img = decode(path, 4)?;
        tex.image_2d(
            gl::TEXTURE_CUBE_MAP_POSITIVE_X + i as GLenum,
            (img.width, img.height),
            gl::RGBA,
            &img.data,
        );
        log::debug!("cubemap face {i}: {}", path.display());
    }

    tex.parameter(gl::TEXTURE_MIN_FILTER, gl::LINEAR);
    tex.parameter(gl::TEXTURE_MAG_FILTER, gl::LINEAR);
    tex.parameter(gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE);
    tex.parameter(gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE);
    tex.parameter(gl::TEXTURE_WRAP_R, gl::CLAMP_TO_EDGE);

    log::info!("loaded cubemap from {}", faces[0].as_ref().display());
    Ok(tex)
}

/// Decodes to 8-bit pixels. `force_channels` of 0 keeps the file's layout.
fn decode(path: &Path, force_channels: usize) -> Result<Image<u8>> {
    match image::load_with_depth(path, force_channels, true) {
        LoadResult::ImageU8(img) => Ok(img),
        LoadResult::ImageF32(_) => Err(Error::Image {
            path: path.to_path_buf(),
            reason: "decoded as floating point".to_string(),
        }),
        LoadResult::Error(reason) => Err(Error::Image {
            path: path.to_path_buf(),
            reason,
        }),
    }
}

pub fn pixel_format(channels: usize) -> Option<GLenum> {
    match channels {
        1 => Some(gl::RED),
        3 => Some(gl::RGB),
        4 => Some(gl::RGBA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn channel_counts_map_to_formats() {
        assert_eq!(pixel_format(1), Some(gl::RED));
        assert_eq!(pixel_format(3), Some(gl::RGB));
        assert_eq!(pixel_format(4), Some(gl::RGBA));
        assert_eq!(pixel_format(2), None);
        assert_eq!(pixel_format(0), None);
    }

    #[test]
    fn undecodable_file_reports_its_path() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("ground.jpg");
        fs::write(&path, b"definitely not a jpeg").unwrap();

        match decode(&path, 0) {
            Err(Error::Image { path: reported, .. }) => assert_eq!(reported, path),
            Err(other) => panic!("expected an image error, got {other:?}"),
            Ok(_) => panic!("garbage decoded as an image"),
        }
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(matches!(
            decode(&dir.path().join("mercury_ft.jpg"), 4),
            Err(Error::Image { .. })
        ));
    }
}
