//! Triangle mesh with per-corner attribute indices and optional texture maps.
//!
//! A [`Model`] keeps positions, normals and UVs in separate arrays; each face
//! corner picks one entry of each through a [`FaceVertex`]. Models are usually
//! loaded from Wavefront OBJ files, with texture maps picked up from sibling
//! files that share the OBJ's stem:
//!
//! | suffix            | map                          |
//! |-------------------|------------------------------|
//! | `_diffuse.tga`    | base color                   |
//! | `_nm.tga`         | object-space normal map      |
//! | `_nm_tangent.tga` | tangent-space normal map     |
//! | `_spec.tga`       | specular exponent (1 channel)|

use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::colors::{self, Color};
use crate::error::{AttributeKind, Error, Result};
use crate::math::vec2::Uv;
use crate::math::vec3::Vec3;
use crate::texture::Texture;

/// Attribute indices (0-based) of one face corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceVertex {
    pub position: usize,
    pub uv: usize,
    pub normal: usize,
}

impl FaceVertex {
    pub const fn new(position: usize, uv: usize, normal: usize) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

pub type Face = [FaceVertex; 3];

/// Texture maps attached to a model. Any of them may be missing.
#[derive(Debug, Clone, Default)]
pub struct Maps {
    pub diffuse: Option<Texture>,
    pub normal: Option<Texture>,
    pub tangent_normal: Option<Texture>,
    pub specular: Option<Texture>,
}

#[derive(Debug, Clone)]
pub struct Model {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Uv>,
    faces: Vec<Face>,
    maps: Maps,
}

impl Model {
    /// Builds a model from raw arrays, checking every face index.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        uvs: Vec<Uv>,
        faces: Vec<Face>,
    ) -> Result<Self> {
        for (face, corners) in faces.iter().enumerate() {
            for fv in corners {
                let checks = [
                    (AttributeKind::Position, fv.position, positions.len()),
                    (AttributeKind::Uv, fv.uv, uvs.len()),
                    (AttributeKind::Normal, fv.normal, normals.len()),
                ];
                for (kind, index, len) in checks {
                    if index >= len {
                        return Err(Error::InvalidFaceIndex { face, kind, index });
                    }
                }
            }
        }

        Ok(Self {
            positions,
            normals,
            uvs,
            faces,
            maps: Maps::default(),
        })
    }

    /// Load a model from an OBJ file, together with any sibling texture maps.
    ///
    /// Polygons are triangulated. Files with several objects are merged into
    /// one model.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &load_options())?;
        let mut model = Self::from_tobj(&models)?;
        model.maps = Maps {
            diffuse: load_sibling(path, "_diffuse.tga"),
            normal: load_sibling(path, "_nm.tga"),
            tangent_normal: load_sibling(path, "_nm_tangent.tga"),
            specular: load_sibling(path, "_spec.tga"),
        };
        Ok(model)
    }

    /// Parse OBJ text from a reader. Material libraries are not followed and
    /// no texture maps are attached.
    pub fn from_obj_buf<R: BufRead>(reader: &mut R) -> Result<Self> {
        let (models, _materials) =
            tobj::load_obj_buf(reader, &load_options(), |_| {
                Err(tobj::LoadError::OpenFileFailed)
            })?;
        Self::from_tobj(&models)
    }

    fn from_tobj(models: &[tobj::Model]) -> Result<Self> {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut uvs = Vec::new();
        let mut faces = Vec::new();

        for m in models {
            let mesh = &m.mesh;
            let position_base = positions.len();
            let normal_base = normals.len();
            let uv_base = uvs.len();

            positions.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );
            normals.extend(
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| Vec3::new(n[0], n[1], n[2])),
            );
            uvs.extend(mesh.texcoords.chunks_exact(2).map(|t| Uv::new(t[0], t[1])));

            let has_normals = mesh.normal_indices.len() == mesh.indices.len();
            let has_uvs = mesh.texcoord_indices.len() == mesh.indices.len();
            if !has_normals {
                warn!("object '{}' has no normals, using face normals", m.name);
            }

            for (tri, corners) in mesh.indices.chunks_exact(3).enumerate() {
                let mut face = [FaceVertex::default(); 3];
                for (nth, fv) in face.iter_mut().enumerate() {
                    let k = tri * 3 + nth;
                    fv.position = position_base + corners[nth] as usize;
                    fv.uv = if has_uvs {
                        uv_base + mesh.texcoord_indices[k] as usize
                    } else {
                        usize::MAX
                    };
                    fv.normal = if has_normals {
                        normal_base + mesh.normal_indices[k] as usize
                    } else {
                        usize::MAX
                    };
                }
                faces.push(face);
            }
        }

        if faces.is_empty() {
            return Err(Error::EmptyModel);
        }

        // Corners without a UV share a single (0, 0) coordinate; corners
        // without a normal get the normal of their face.
        if faces.iter().flatten().any(|fv| fv.uv == usize::MAX) {
            let missing = uvs.len();
            uvs.push(Uv::new(0.0, 0.0));
            for fv in faces.iter_mut().flatten().filter(|fv| fv.uv == usize::MAX) {
                fv.uv = missing;
            }
        }
        for face in faces.iter_mut() {
            if face.iter().any(|fv| fv.normal == usize::MAX) {
                let n = face_normal(&positions, face);
                normals.push(n);
                let index = normals.len() - 1;
                for fv in face.iter_mut().filter(|fv| fv.normal == usize::MAX) {
                    fv.normal = index;
                }
            }
        }

        info!(
            "# v# {} f# {} vt# {} vn# {}",
            positions.len(),
            faces.len(),
            uvs.len(),
            normals.len()
        );

        Self::new(positions, normals, uvs, faces)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Position of corner `nth` (0..3) of face `face`.
    #[inline]
    pub fn vertex(&self, face: usize, nth: usize) -> Vec3 {
        self.positions[self.faces[face][nth].position]
    }

    /// Unit normal of corner `nth` of face `face`.
    #[inline]
    pub fn normal(&self, face: usize, nth: usize) -> Vec3 {
        self.normals[self.faces[face][nth].normal].normalize()
    }

    #[inline]
    pub fn uv(&self, face: usize, nth: usize) -> Uv {
        self.uvs[self.faces[face][nth].uv]
    }

    pub fn maps(&self) -> &Maps {
        &self.maps
    }

    pub fn set_maps(&mut self, maps: Maps) {
        self.maps = maps;
    }

    /// Diffuse color at `uv`, white without a diffuse map.
    pub fn diffuse(&self, uv: Uv) -> Color {
        self.maps
            .diffuse
            .as_ref()
            .map_or(colors::WHITE, |t| t.sample(uv))
    }

    /// Object-space normal from the `_nm` map, `+Z` without one.
    pub fn normal_from_map(&self, uv: Uv) -> Vec3 {
        decode_normal(self.maps.normal.as_ref(), uv)
    }

    /// Tangent-space normal from the `_nm_tangent` map, `+Z` without one.
    pub fn tangent_normal(&self, uv: Uv) -> Vec3 {
        decode_normal(self.maps.tangent_normal.as_ref(), uv)
    }

    /// Specular exponent from the first channel of the specular map, 0 without one.
    pub fn specular(&self, uv: Uv) -> f32 {
        self.maps
            .specular
            .as_ref()
            .map_or(0.0, |t| t.sample(uv).r as f32)
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ..Default::default()
    }
}

/// `models/head.obj` + `_diffuse.tga` -> `models/head_diffuse.tga`.
fn sibling_path(obj: &Path, suffix: &str) -> PathBuf {
    let stem = obj.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    obj.with_file_name(format!("{stem}{suffix}"))
}

fn load_sibling(obj: &Path, suffix: &str) -> Option<Texture> {
    let path = sibling_path(obj, suffix);
    match Texture::from_file(&path) {
        Ok(texture) => {
            info!("texture file {} loading ok", path.display());
            Some(texture)
        }
        Err(e) => {
            warn!("texture file {} loading failed: {e}", path.display());
            None
        }
    }
}

/// Channels map to components as `c / 255 * 2 - 1`, R to x, G to y, B to z.
fn decode_normal(map: Option<&Texture>, uv: Uv) -> Vec3 {
    let Some(map) = map else {
        return Vec3::FORWARD;
    };
    let c = map.sample(uv);
    let decode = |v: u8| v as f32 / 255.0 * 2.0 - 1.0;
    Vec3::new(decode(c.r), decode(c.g), decode(c.b))
}

fn face_normal(positions: &[Vec3], face: &Face) -> Vec3 {
    let [a, b, c] = face.map(|fv| positions[fv.position]);
    let n = (b - a).cross(c - a);
    if n.magnitude() > 0.0 {
        n.normalize()
    } else {
        warn!("degenerate face, normal defaults to +Z");
        Vec3::FORWARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Format};
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_is_triangulated() {
        let model = Model::from_obj_buf(&mut Cursor::new(QUAD)).unwrap();
        assert_eq!(model.vertex_count(), 4);
        assert_eq!(model.face_count(), 2);
        assert_eq!(model.vertex(0, 1), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(model.uv(0, 2), Uv::new(1.0, 1.0));
        assert_eq!(model.normal(1, 0), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn missing_normals_and_uvs_are_synthesised() {
        let obj = "v 0 0 0\nv 2 0 0\nv 0 2 0\nf 1 2 3\n";
        let model = Model::from_obj_buf(&mut Cursor::new(obj)).unwrap();
        assert_eq!(model.uv(0, 1), Uv::new(0.0, 0.0));
        let n = model.normal(0, 2);
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn empty_obj_is_rejected() {
        let result = Model::from_obj_buf(&mut Cursor::new("v 0 0 0\n"));
        assert!(matches!(result, Err(Error::EmptyModel)));
    }

    #[test]
    fn new_rejects_out_of_range_indices() {
        let face = [
            FaceVertex::new(0, 0, 0),
            FaceVertex::new(1, 0, 0),
            FaceVertex::new(2, 0, 3),
        ];
        let result = Model::new(
            vec![Vec3::ZERO; 3],
            vec![Vec3::FORWARD],
            vec![Uv::default()],
            vec![face],
        );
        assert!(matches!(
            result,
            Err(Error::InvalidFaceIndex {
                face: 0,
                kind: AttributeKind::Normal,
                index: 3
            })
        ));
    }

    #[test]
    fn missing_maps_fall_back() {
        let model = Model::from_obj_buf(&mut Cursor::new(QUAD)).unwrap();
        let uv = Uv::new(0.5, 0.5);
        assert_eq!(model.diffuse(uv), colors::WHITE);
        assert_eq!(model.normal_from_map(uv), Vec3::FORWARD);
        assert_eq!(model.tangent_normal(uv), Vec3::FORWARD);
        assert_eq!(model.specular(uv), 0.0);
    }

    #[test]
    fn normal_map_decodes_channels() {
        let mut canvas = Canvas::new(1, 1, Format::Rgb);
        canvas.set(0, 0, Color::rgb(255, 0, 255));
        let mut model = Model::from_obj_buf(&mut Cursor::new(QUAD)).unwrap();
        model.set_maps(Maps {
            normal: Some(Texture::from_canvas(canvas)),
            ..Maps::default()
        });
        let n = model.normal_from_map(Uv::new(0.5, 0.5));
        assert_relative_eq!(n.x, 1.0);
        assert_relative_eq!(n.y, -1.0);
        assert_relative_eq!(n.z, 1.0);
    }

    #[test]
    fn sibling_texture_names() {
        let p = sibling_path(Path::new("obj/african_head.obj"), "_nm.tga");
        assert_eq!(p, Path::new("obj/african_head_nm.tga"));
    }
}
