use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

use crate::attributes::{UvCorners, UvTag};
use crate::document::MeshDocument;
use crate::error::IoError;
use crate::mesh::{Polygon, PolygonMesh};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: false,
        single_index: false,
        ..Default::default()
    }
}

pub fn load_obj(path: &Path) -> Result<MeshDocument, IoError> {
    if !path.exists() {
        return Err(IoError::Obj(format!("file not found: {}", path.display())));
    }
    let (models, _) = tobj::load_obj(path, &load_options())
        .map_err(|err| IoError::Obj(err.to_string()))?;
    build_document_from_models(models)
}

pub fn load_obj_bytes(data: &[u8]) -> Result<MeshDocument, IoError> {
    let mut reader = BufReader::new(Cursor::new(data));
    let (models, _) = tobj::load_obj_buf(&mut reader, &load_options(), |_path| {
        Ok((Vec::new(), Default::default()))
    })
    .map_err(|err| IoError::Obj(err.to_string()))?;
    build_document_from_models(models)
}

fn build_document_from_models(models: Vec<tobj::Model>) -> Result<MeshDocument, IoError> {
    if models.is_empty() {
        return Err(IoError::Obj("OBJ has no geometry".to_string()));
    }

    let mut points: Vec<[f32; 3]> = Vec::new();
    let mut polygons: Vec<Polygon> = Vec::new();
    let mut uv_rows: Vec<UvCorners> = Vec::new();
    let mut include_uvs = true;
    let mut point_offset = 0u32;

    for model in models {
        let mesh = &model.mesh;
        if mesh.positions.len() % 3 != 0 {
            return Err(IoError::Obj("OBJ has malformed positions".to_string()));
        }
        let vertex_count = mesh.positions.len() / 3;
        points.extend(mesh.positions.chunks_exact(3).map(|v| [v[0], v[1], v[2]]));

        let has_uvs = !mesh.texcoord_indices.is_empty()
            && mesh.texcoord_indices.len() == mesh.indices.len();
        include_uvs &= has_uvs;

        // An empty arity list means every face is a triangle.
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|arity| *arity as usize).collect()
        };

        let mut cursor = 0;
        for arity in arities {
            let face = polygons.len();
            if !(3..=4).contains(&arity) {
                return Err(IoError::UnsupportedFace { face, arity });
            }
            let corners = mesh
                .indices
                .get(cursor..cursor + arity)
                .ok_or_else(|| IoError::Obj(format!("face {face} indices out of range")))?;
            let idx: Vec<u32> = corners.iter().map(|i| i + point_offset).collect();
            polygons.push(if arity == 3 {
                Polygon::triangle(idx[0], idx[1], idx[2])
            } else {
                Polygon::new(idx[0], idx[1], idx[2], idx[3])
            });

            if has_uvs {
                let mut row = [[0.0, 0.0]; 4];
                for (corner, slot) in row.iter_mut().enumerate() {
                    let source = cursor + corner.min(arity - 1);
                    let t = mesh.texcoord_indices[source] as usize;
                    *slot = [
                        mesh.texcoords.get(t * 2).copied().unwrap_or(0.0),
                        mesh.texcoords.get(t * 2 + 1).copied().unwrap_or(0.0),
                    ];
                }
                uv_rows.push(row);
            }
            cursor += arity;
        }

        point_offset += vertex_count as u32;
    }

    let mesh = PolygonMesh::with_points_polygons(points, polygons);
    mesh.validate()?;
    let mut document = MeshDocument::new(mesh);
    if include_uvs && !uv_rows.is_empty() {
        document.set_uv(UvTag::new(uv_rows))?;
    }
    Ok(document)
}

pub fn write_obj(path: &Path, document: &MeshDocument) -> Result<(), IoError> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj_to(&mut writer, document)?;
    writer.flush()?;
    Ok(())
}

/// Writes points, per-corner `vt` records when a UV channel is present, and one
/// face per polygon. Triangles are written with three corners.
pub fn write_obj_to<W: Write>(writer: &mut W, document: &MeshDocument) -> std::io::Result<()> {
    let mesh = document.mesh();
    for p in &mesh.points {
        writeln!(writer, "v {} {} {}", p[0], p[1], p[2])?;
    }

    let uv = document
        .uv()
        .filter(|uv| uv.len() == mesh.polygon_count());
    if let Some(uv) = uv {
        for row in &uv.corners {
            for t in row {
                writeln!(writer, "vt {} {}", t[0], t[1])?;
            }
        }
    }

    for (index, polygon) in mesh.polygons.iter().enumerate() {
        let corners = polygon.corners();
        let count = if polygon.is_triangle() { 3 } else { 4 };
        let mut line = String::from("f");
        for (corner, point) in corners.iter().enumerate().take(count) {
            let v = point + 1;
            if uv.is_some() {
                let t = index * 4 + corner + 1;
                line.push_str(&format!(" {v}/{t}"));
            } else {
                line.push_str(&format!(" {v}"));
            }
        }
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_quads_and_triangles() {
        let obj = b"v 0 0 0\nv 1 0 0\nv 1 0 1\nv 0 0 1\nv 2 0 0\nf 1 2 3 4\nf 2 5 3\n";
        let doc = load_obj_bytes(obj).expect("load");
        assert_eq!(doc.mesh().point_count(), 5);
        assert_eq!(doc.mesh().polygon_count(), 2);
        assert!(!doc.mesh().polygons[0].is_triangle());
        assert!(doc.mesh().polygons[1].is_triangle());
        assert!(doc.uv().is_none());
    }

    #[test]
    fn ngons_are_rejected() {
        let obj = b"v 0 0 0\nv 1 0 0\nv 2 0 1\nv 1 0 2\nv 0 0 1\nf 1 2 3 4 5\n";
        let result = load_obj_bytes(obj);
        assert!(matches!(
            result,
            Err(IoError::UnsupportedFace { face: 0, arity: 5 })
        ));
    }

    #[test]
    fn written_obj_reads_back() {
        let mesh = PolygonMesh::with_points_polygons(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
                [2.0, 0.0, 0.0],
            ],
            vec![Polygon::new(0, 1, 2, 3), Polygon::triangle(1, 4, 2)],
        );
        let mut doc = MeshDocument::new(mesh);
        doc.set_uv(UvTag::new(vec![
            [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [1.0, 1.0]],
        ]))
        .expect("uv");

        let mut buffer = Vec::new();
        write_obj_to(&mut buffer, &doc).expect("write");
        let text = String::from_utf8(buffer.clone()).expect("utf8");
        assert!(text.contains("f 1/1 2/2 3/3 4/4"));
        assert!(text.contains("f 2/5 5/6 3/7\n"));

        let loaded = load_obj_bytes(&buffer).expect("load");
        assert_eq!(loaded.mesh().point_count(), 5);
        assert_eq!(loaded.mesh().polygon_count(), 2);
        assert_eq!(loaded.mesh().triangle_count(), 1);
        let uv = loaded.uv().expect("uv");
        assert_eq!(uv.corners[0], [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }
}
