//! OBJ/MTL reader
//!
//! Turns Wavefront OBJ and MTL text into [`SceneBuilder`] calls, line by line in
//! file order. Only the subset the viewer uses is understood; other keywords
//! are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use sceneview_common::Scene;

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::scene::{FaceVertex, SceneBuilder};
use crate::texture::TextureDecoder;

/// Build a scene from an OBJ file and the material libraries it references
pub fn build_scene<D: TextureDecoder>(
    input: &Path,
    decoder: D,
    config: &ExportConfig,
) -> Result<Scene> {
    let mut builder = SceneBuilder::with_config(decoder, config);
    read_obj(&mut builder, input)?;
    builder.finish()
}

/// Feed an OBJ file into `builder`
pub fn read_obj<D: TextureDecoder>(builder: &mut SceneBuilder<D>, path: &Path) -> Result<()> {
    for_each_line(path, |line, fields| {
        match fields[0] {
            "v" => builder.add_position(parse_floats(&line, &fields[1..])?),
            "vt" => builder.add_tex_coord(parse_floats(&line, &fields[1..])?),
            "f" => {
                let face = fields[1..]
                    .iter()
                    .map(|corner| parse_face_vertex(&line, corner))
                    .collect::<Result<Vec<_>>>()?;
                if face.len() < 3 {
                    return Err(line.malformed(format!(
                        "face needs at least 3 vertices, got {}",
                        face.len()
                    )));
                }
                builder.add_face(&face)?;
            }
            "g" => builder.begin_group()?,
            "usemtl" => builder.use_material(line.required(&fields, 1)?)?,
            "mtllib" => {
                line.required(&fields, 1)?;
                for library in &fields[1..] {
                    read_mtl(builder, &sibling(path, library))?;
                }
            }
            _ => {}
        }
        Ok(())
    })
}

/// Feed an MTL material library into `builder`
pub fn read_mtl<D: TextureDecoder>(builder: &mut SceneBuilder<D>, path: &Path) -> Result<()> {
    tracing::debug!("Reading material library {:?}", path);
    builder.begin_material_library();
    for_each_line(path, |line, fields| {
        match fields[0] {
            "newmtl" => builder.declare_material(line.required(&fields, 1)?),
            "map_Ka" => {
                line.required(&fields, 1)?;
                // Options such as `-s 1 1 1` may precede the file name
                let file = fields[fields.len() - 1];
                let texture = sibling(path, file);
                match builder.set_material_texture(&texture)? {
                    Some((material, index)) => {
                        tracing::debug!("Material '{}' -> texture {}", material, index)
                    }
                    None => return Err(line.malformed("map_Ka before any newmtl")),
                }
            }
            _ => {}
        }
        Ok(())
    })
}

/// Location of a line being parsed, for diagnostics
struct Line<'a> {
    path: &'a Path,
    number: usize,
}

impl Line<'_> {
    fn malformed(&self, message: impl Into<String>) -> ExportError {
        ExportError::MalformedInput {
            path: self.path.to_path_buf(),
            line: self.number,
            message: message.into(),
        }
    }

    fn required<'f>(&self, fields: &[&'f str], at: usize) -> Result<&'f str> {
        fields.get(at).copied().ok_or_else(|| {
            self.malformed(format!("'{}' needs at least {} argument(s)", fields[0], at))
        })
    }
}

/// Call `f` with the whitespace-separated fields of every non-blank, non-comment line
fn for_each_line<F>(path: &Path, mut f: F) -> Result<()>
where
    F: FnMut(Line<'_>, Vec<&str>) -> Result<()>,
{
    let file = File::open(path).map_err(|e| ExportError::io(path, e))?;
    let reader = BufReader::new(file);

    for (i, text) in reader.lines().enumerate() {
        let text = text.map_err(|e| ExportError::io(path, e))?;
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = text.split_whitespace().collect();
        f(
            Line {
                path,
                number: i + 1,
            },
            fields,
        )?;
    }
    Ok(())
}

/// Parse the first `N` fields as floats; extra fields (e.g. `w`) are ignored
fn parse_floats<const N: usize>(line: &Line<'_>, fields: &[&str]) -> Result<[f32; N]> {
    if fields.len() < N {
        return Err(line.malformed(format!(
            "expected {} values, got {}",
            N,
            fields.len()
        )));
    }
    let mut values = [0.0; N];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field
            .parse()
            .map_err(|_| line.malformed(format!("invalid number '{}'", field)))?;
    }
    Ok(values)
}

/// Parse a face corner `v/vt` or `v/vt/vn` into 0-based indices
///
/// The normal index is ignored: normals are computed per face.
fn parse_face_vertex(line: &Line<'_>, corner: &str) -> Result<FaceVertex> {
    let mut parts = corner.split('/');
    let position = parts.next().unwrap_or_default();
    let tex_coord = parts.next().unwrap_or_default();
    if tex_coord.is_empty() {
        return Err(line.malformed(format!(
            "face vertex '{}' has no texture coordinate",
            corner
        )));
    }
    Ok(FaceVertex::new(
        parse_index(line, position)?,
        parse_index(line, tex_coord)?,
    ))
}

/// OBJ indices are 1-based
fn parse_index(line: &Line<'_>, field: &str) -> Result<usize> {
    field
        .parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .ok_or_else(|| line.malformed(format!("invalid index '{}'", field)))
}

/// Resolve a file named inside `path` relative to `path`'s directory
fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent().unwrap_or_else(|| Path::new("")).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnresolvedReference;
    use crate::texture::DecodedImage;
    use std::fs;

    /// Decodes any path to a 2x2 opaque white image
    struct WhiteDecoder;

    impl TextureDecoder for WhiteDecoder {
        fn decode(&self, _path: &Path) -> anyhow::Result<DecodedImage> {
            DecodedImage::new(2, 2, vec![255; 16])
        }
    }

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn build(obj: &Path) -> Result<Scene> {
        build_scene(obj, WhiteDecoder, &ExportConfig::default())
    }

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
";

    #[test]
    fn test_textured_quad() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "scene.mtl", "newmtl wood\nmap_Ka wood.png\n");
        let obj = write(
            dir.path(),
            "scene.obj",
            &format!("# quad\nmtllib scene.mtl\n{QUAD}g quad\nusemtl wood\nf 1/1 2/2 3/3 4/4\n"),
        );

        let scene = build(&obj).unwrap();
        assert_eq!(scene.textures.len(), 1);
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].texture_index, Some(0));
        assert_eq!(scene.meshes[0].vertices.len(), 4);
        assert_eq!(scene.meshes[0].indices.len(), 6);
    }

    #[test]
    fn test_normal_indices_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(
            dir.path(),
            "scene.obj",
            &format!("{QUAD}vn 1 0 0\nf 1/1/1 2/2/1 3/3/1\n"),
        );

        let scene = build(&obj).unwrap();
        assert_eq!(scene.meshes[0].vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_extra_fields_and_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(
            dir.path(),
            "scene.obj",
            "v 0 0 0 1\r\nv 1 0 0 1\r\nv 0 1 0 1\r\nvt 0 0 0\r\n\r\nf 1/1 2/1 3/1\r\n",
        );

        let scene = build(&obj).unwrap();
        assert_eq!(scene.meshes[0].vertices.len(), 3);
    }

    #[test]
    fn test_groups_split_meshes() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(
            dir.path(),
            "scene.obj",
            &format!("{QUAD}g a\nf 1/1 2/2 3/3\ng b\nf 1/1 3/3 4/4\n"),
        );

        let scene = build(&obj).unwrap();
        assert_eq!(scene.meshes.len(), 2);
    }

    #[test]
    fn test_missing_tex_coord_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(dir.path(), "scene.obj", &format!("{QUAD}f 1 2 3\n"));

        let err = build(&obj).unwrap_err();
        assert!(matches!(err, ExportError::MalformedInput { line: 9, .. }));
    }

    #[test]
    fn test_bad_number_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(dir.path(), "scene.obj", "v 0 zero 0\n");

        let err = build(&obj).unwrap_err();
        assert!(matches!(err, ExportError::MalformedInput { line: 1, .. }));
        assert!(err.to_string().contains("invalid number 'zero'"));
    }

    #[test]
    fn test_short_vertex_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(dir.path(), "scene.obj", "# header\n\nvt 0.5\n");

        let err = build(&obj).unwrap_err();
        assert!(matches!(err, ExportError::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn test_zero_index_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(dir.path(), "scene.obj", &format!("{QUAD}f 0/1 1/1 2/1\n"));
        assert!(matches!(
            build(&obj),
            Err(ExportError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_two_corner_face_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(dir.path(), "scene.obj", &format!("{QUAD}f 1/1 2/2\n"));
        assert!(matches!(
            build(&obj),
            Err(ExportError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_out_of_range_index() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(dir.path(), "scene.obj", &format!("{QUAD}f 1/1 2/2 5/3\n"));

        let err = build(&obj).unwrap_err();
        assert!(matches!(
            err,
            ExportError::UnresolvedReference(UnresolvedReference::Position { index: 4, .. })
        ));
    }

    #[test]
    fn test_undeclared_material() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(dir.path(), "scene.obj", "usemtl nothing\n");

        let err = build(&obj).unwrap_err();
        assert!(matches!(
            err,
            ExportError::UnresolvedReference(UnresolvedReference::UndeclaredMaterial(_))
        ));
    }

    #[test]
    fn test_untextured_material_referenced_by_face() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "scene.mtl", "newmtl plain\nKd 1 1 1\n");
        let obj = write(
            dir.path(),
            "scene.obj",
            &format!("mtllib scene.mtl\n{QUAD}usemtl plain\nf 1/1 2/2 3/3\n"),
        );

        let err = build(&obj).unwrap_err();
        assert!(matches!(
            err,
            ExportError::UnresolvedReference(UnresolvedReference::UntexturedMaterial(_))
        ));
    }

    #[test]
    fn test_texture_path_relative_to_mtl() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("materials")).unwrap();
        write(
            &dir.path().join("materials"),
            "scene.mtl",
            "newmtl a\nmap_Ka -s 1 1 1 tex.png\nnewmtl b\nmap_Ka tex.png\n",
        );
        let obj = write(dir.path(), "scene.obj", "mtllib materials/scene.mtl\n");

        let mut builder = SceneBuilder::new(WhiteDecoder);
        read_obj(&mut builder, &obj).unwrap();
        assert_eq!(builder.material_texture("a"), Some(Some(0)));
        assert_eq!(builder.material_texture("b"), Some(Some(0)));
        assert_eq!(
            builder
                .register_texture(&dir.path().join("materials").join("tex.png"))
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_map_before_newmtl_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "scene.mtl", "map_Ka tex.png\n");
        let obj = write(dir.path(), "scene.obj", "mtllib scene.mtl\n");

        let err = build(&obj).unwrap_err();
        match err {
            ExportError::MalformedInput { path, line, .. } => {
                assert!(path.ends_with("scene.mtl"));
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_material_does_not_carry_into_next_library() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.mtl", "newmtl first\nmap_Ka a.png\n");
        write(dir.path(), "b.mtl", "map_Ka b.png\nnewmtl second\n");
        let obj = write(dir.path(), "scene.obj", "mtllib a.mtl b.mtl\n");

        let mut builder = SceneBuilder::new(WhiteDecoder);
        let err = read_obj(&mut builder, &obj).unwrap_err();
        match err {
            ExportError::MalformedInput { path, line, .. } => {
                assert!(path.ends_with("b.mtl"));
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(builder.material_texture("first"), Some(Some(0)));
    }

    #[test]
    fn test_materials_from_two_libraries() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.mtl", "newmtl first\nmap_Ka a.png\n");
        write(dir.path(), "b.mtl", "newmtl second\nmap_Ka b.png\n");
        let obj = write(dir.path(), "scene.obj", "mtllib a.mtl\nmtllib b.mtl\n");

        let mut builder = SceneBuilder::new(WhiteDecoder);
        read_obj(&mut builder, &obj).unwrap();
        assert_eq!(builder.material_texture("first"), Some(Some(0)));
        assert_eq!(builder.material_texture("second"), Some(Some(1)));
    }

    #[test]
    fn test_missing_mtl_file() {
        let dir = tempfile::tempdir().unwrap();
        let obj = write(dir.path(), "scene.obj", "mtllib nowhere.mtl\n");
        assert!(matches!(build(&obj), Err(ExportError::Io { .. })));
    }

    #[test]
    fn test_sibling() {
        assert_eq!(
            sibling(Path::new("models/scene.obj"), "scene.mtl"),
            PathBuf::from("models/scene.mtl")
        );
        assert_eq!(
            sibling(Path::new("scene.obj"), "scene.mtl"),
            PathBuf::from("scene.mtl")
        );
    }
}
