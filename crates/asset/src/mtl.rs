//! MTL material library parser.

use crate::{
    error::ParseError,
    material::{MaterialMap, MaterialRecord},
    statement::{Statement, statements},
};

/// Parse MTL text into a material map. Redefined names keep the last definition.
pub fn parse_mtl(text: &str) -> Result<MaterialMap, ParseError> {
    let mut materials = MaterialMap::new();
    let mut current: Option<String> = None;

    for stmt in statements(text) {
        let directive = Directive::from_tag(stmt.tag);
        match directive {
            Directive::NewMaterial => {
                let name = stmt.name()?;
                if materials.insert(MaterialRecord::new(name)).is_some() {
                    log::debug!("Material '{}' redefined on line {}", name, stmt.line);
                }
                current = Some(name.to_owned());
            }
            Directive::Unknown => {
                log::trace!("Skipping unsupported MTL directive '{}' on line {}", stmt.tag, stmt.line);
            }
            property => {
                let record = current
                    .as_deref()
                    .and_then(|name| materials.get_mut(name))
                    .ok_or_else(|| ParseError::OrphanProperty {
                        line: stmt.line,
                        directive: stmt.tag.to_owned(),
                    })?;
                apply(record, property, &stmt)?;
            }
        }
    }

    log::debug!("Parsed MTL: {} materials", materials.len());
    Ok(materials)
}

/// Join several MTL documents in the given order and parse them once, so a
/// name defined in a later source overrides earlier ones.
pub fn parse_mtl_sources<S: AsRef<str>>(sources: &[S]) -> Result<MaterialMap, ParseError> {
    let joined = sources
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    parse_mtl(&joined)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Directive {
    NewMaterial,
    Ambient,
    Diffuse,
    Specular,
    Emissive,
    Shininess,
    Dissolve,
    Transparency,
    OpticalDensity,
    Illumination,
    DiffuseMap,
    AmbientMap,
    SpecularMap,
    ShininessMap,
    OpacityMap,
    BumpMap,
    Unknown,
}

impl Directive {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "newmtl" => Self::NewMaterial,
            "Ka" => Self::Ambient,
            "Kd" => Self::Diffuse,
            "Ks" => Self::Specular,
            "Ke" => Self::Emissive,
            "Ns" => Self::Shininess,
            "d" => Self::Dissolve,
            "Tr" => Self::Transparency,
            "Ni" => Self::OpticalDensity,
            "illum" => Self::Illumination,
            "map_Kd" => Self::DiffuseMap,
            "map_Ka" => Self::AmbientMap,
            "map_Ks" => Self::SpecularMap,
            "map_Ns" => Self::ShininessMap,
            "map_d" => Self::OpacityMap,
            "map_Bump" | "map_bump" | "bump" | "norm" => Self::BumpMap,
            _ => Self::Unknown,
        }
    }
}

fn apply(
    record: &mut MaterialRecord,
    directive: Directive,
    stmt: &Statement<'_>,
) -> Result<(), ParseError> {
    match directive {
        Directive::Ambient => record.ambient = stmt.vec3()?,
        Directive::Diffuse => record.diffuse = stmt.vec3()?,
        Directive::Specular => record.specular = stmt.vec3()?,
        Directive::Emissive => record.emissive = stmt.vec3()?,
        Directive::Shininess => record.shininess = stmt.scalar()?,
        Directive::Dissolve => record.opacity = stmt.scalar()?,
        // Tr is transparency, the inverse of d.
        Directive::Transparency => record.opacity = 1.0 - stmt.scalar()?,
        Directive::OpticalDensity => record.optical_density = stmt.scalar()?,
        Directive::Illumination => {
            let token = stmt.operands().next().ok_or_else(|| stmt.missing())?;
            record.illumination = Some(token.parse().map_err(|_| stmt.malformed(token))?);
        }
        Directive::DiffuseMap => record.maps.diffuse = Some(map_file(stmt)?),
        Directive::AmbientMap => record.maps.ambient = Some(map_file(stmt)?),
        Directive::SpecularMap => record.maps.specular = Some(map_file(stmt)?),
        Directive::ShininessMap => record.maps.shininess = Some(map_file(stmt)?),
        Directive::OpacityMap => record.maps.opacity = Some(map_file(stmt)?),
        Directive::BumpMap => record.maps.bump = Some(map_file(stmt)?),
        Directive::NewMaterial | Directive::Unknown => {}
    }
    Ok(())
}

/// File name of a texture map statement. With `-opt value` arguments present
/// the file is the last token; otherwise the whole operand (may contain spaces).
fn map_file(stmt: &Statement<'_>) -> Result<String, ParseError> {
    let rest = stmt.name()?;
    let file = if rest.starts_with('-') {
        stmt.operands().next_back().unwrap_or(rest)
    } else {
        rest
    };
    Ok(file.to_owned())
}
