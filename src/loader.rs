use crate::body::{palette_color, Body};
use anyhow::{Context, Result};
use glam::Vec3;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Most bodies a catalog may hold; later records are skipped.
pub const MAX_BODIES: usize = 100;

const BASE_FIELDS: usize = 9;
const COLOR_FIELDS: usize = 12;

/// Loads body catalogs from CSV text.
///
/// One record per line: `name, radius, mass, px, py, pz, vx, vy, vz`,
/// optionally followed by `r, g, b` in [0, 1]. Lines starting with `#` and
/// blank lines are ignored. Malformed records are skipped with a warning.
pub struct CatalogLoader;

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the source.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub bodies: Vec<Body>,
    pub skipped: Vec<SkippedLine>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|body| body.name == name)
    }

    /// Multiplies every radius by `factor`.
    pub fn scale_radii(&mut self, factor: f32) {
        for body in &mut self.bodies {
            body.radius *= factor;
        }
    }
}

impl CatalogLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open catalog {}", path.display()))?;
        let catalog = Self::parse(file)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;

        log::info!(
            "Loaded catalog {}: {} bodies, {} lines skipped",
            path.display(),
            catalog.len(),
            catalog.skipped.len()
        );
        Ok(catalog)
    }

    pub fn parse<R: Read>(reader: R) -> Result<Catalog> {
        let mut catalog = Catalog::default();

        for (line_index, raw) in BufReader::new(reader).split(b'\n').enumerate() {
            let raw = raw?;
            let line_number = line_index + 1;

            let parsed = match String::from_utf8(raw) {
                Err(_) => Err("line is not valid UTF-8".to_string()),
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() || trimmed.starts_with('#') {
                        continue;
                    }
                    if catalog.bodies.len() >= MAX_BODIES {
                        Err(format!("catalog is full ({} bodies)", MAX_BODIES))
                    } else {
                        Self::parse_record(trimmed, catalog.bodies.len())
                    }
                }
            };

            match parsed {
                Ok(body) => catalog.bodies.push(body),
                Err(reason) => {
                    log::warn!("Line {}: {}", line_number, reason);
                    catalog.skipped.push(SkippedLine {
                        line: line_number,
                        reason,
                    });
                }
            }
        }

        Ok(catalog)
    }

    fn parse_record(line: &str, index: usize) -> std::result::Result<Body, String> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != BASE_FIELDS && fields.len() != COLOR_FIELDS {
            return Err(format!(
                "expected {} or {} fields, got {}",
                BASE_FIELDS,
                COLOR_FIELDS,
                fields.len()
            ));
        }

        let name = fields[0];
        if name.is_empty() {
            return Err("field 0: empty name".to_string());
        }

        let mut values = [0.0f32; COLOR_FIELDS - 1];
        for (slot, (field_index, field)) in values.iter_mut().zip(fields.iter().enumerate().skip(1)) {
            *slot = field
                .parse::<f32>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| format!("field {} ('{}'): expected float", field_index, field))?;
        }

        let [radius, mass, px, py, pz, vx, vy, vz, ..] = values;
        if radius <= 0.0 {
            return Err(format!("radius must be positive, got {}", radius));
        }
        if mass < 0.0 {
            return Err(format!("mass must not be negative, got {}", mass));
        }

        let color = if fields.len() == COLOR_FIELDS {
            [values[8], values[9], values[10]].map(|channel| channel.clamp(0.0, 1.0))
        } else {
            palette_color(index)
        };

        Ok(Body::new(name, radius, mass, Vec3::new(px, py, pz))
            .with_velocity(Vec3::new(vx, vy, vz))
            .with_color(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_fields() {
        let catalog = CatalogLoader::parse("Earth, 6.4, 5.9, 1, 2, 3, 4, 5, 6\n".as_bytes()).unwrap();
        let body = &catalog.bodies[0];
        assert_eq!(body.name, "Earth");
        assert_eq!(body.radius, 6.4);
        assert_eq!(body.mass, 5.9);
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(body.velocity, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(body.color, palette_color(0));
    }

    #[test]
    fn test_explicit_color_is_clamped() {
        let catalog =
            CatalogLoader::parse("Mars,3.4,0.6,0,0,0,0,0,0,1.5,0.25,-1\n".as_bytes()).unwrap();
        assert_eq!(catalog.bodies[0].color, [1.0, 0.25, 0.0]);
    }

    #[test]
    fn test_capacity_limit() {
        let text: String = (0..MAX_BODIES + 3)
            .map(|i| format!("b{},1,1,{},0,0,0,0,0\n", i, i))
            .collect();
        let catalog = CatalogLoader::parse(text.as_bytes()).unwrap();
        assert_eq!(catalog.len(), MAX_BODIES);
        assert_eq!(catalog.skipped.len(), 3);
        assert_eq!(catalog.skipped[0].line, MAX_BODIES + 1);
    }

    #[test]
    fn test_scale_radii() {
        let mut catalog = CatalogLoader::parse("a,2,1,0,0,0,0,0,0\n".as_bytes()).unwrap();
        catalog.scale_radii(100.0);
        assert_eq!(catalog.bodies[0].radius, 200.0);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "a,1,1,0,0,0,0,0,0\r\nb,1,1,0,0,0,0,0,0\r\n";
        let catalog = CatalogLoader::parse(text.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.bodies[1].name, "b");
    }
}
