//! Material descriptions decoded from `Appearance` nodes
//!
//! A [`MaterialDesc`] is plain data handed to the world adapter alongside a
//! mesh. Texture URLs are passed through untouched; fetching them is the
//! adapter's job.

use crate::document::{Rgb, SceneNode};

/// Image texture reference
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// Candidate URLs in preference order, verbatim from the document
    pub url: Vec<String>,
    pub repeat_s: bool,
    pub repeat_t: bool,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            url: Vec::new(),
            repeat_s: true,
            repeat_t: true,
        }
    }
}

impl TextureDesc {
    /// Decodes an `ImageTexture` node
    pub fn from_node(node: &SceneNode) -> Self {
        Self {
            url: node.strings("url").unwrap_or_default(),
            repeat_s: node.field_or("repeatS", true),
            repeat_t: node.field_or("repeatT", true),
        }
    }
}

/// Phong-style surface description
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    /// `DEF` name of the `Material` node, if any
    pub name: Option<String>,
    pub diffuse_color: Rgb,
    pub emissive_color: Rgb,
    pub specular_color: Rgb,
    pub ambient_intensity: f32,
    pub shininess: f32,
    pub transparency: f32,
    pub texture: Option<TextureDesc>,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            name: None,
            diffuse_color: [0.8, 0.8, 0.8],
            emissive_color: [0.0, 0.0, 0.0],
            specular_color: [0.0, 0.0, 0.0],
            ambient_intensity: 0.2,
            shininess: 0.2,
            transparency: 0.0,
            texture: None,
        }
    }
}

impl MaterialDesc {
    /// Decodes the fields of a `Material` node on top of the defaults
    pub fn from_node(node: &SceneNode) -> Self {
        let defaults = Self::default();
        Self {
            name: node.def_name().map(str::to_string),
            diffuse_color: node.field_or("diffuseColor", defaults.diffuse_color),
            emissive_color: node.field_or("emissiveColor", defaults.emissive_color),
            specular_color: node.field_or("specularColor", defaults.specular_color),
            ambient_intensity: node
                .field_or("ambientIntensity", defaults.ambient_intensity)
                .clamp(0.0, 1.0),
            shininess: node.field_or("shininess", defaults.shininess).clamp(0.0, 1.0),
            transparency: node
                .field_or("transparency", defaults.transparency)
                .clamp(0.0, 1.0),
            texture: None,
        }
    }

    /// Builder pattern: attach a texture
    pub fn with_texture(mut self, texture: TextureDesc) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Diffuse color with alpha derived from transparency
    pub fn base_color(&self) -> [f32; 4] {
        let [r, g, b] = self.diffuse_color;
        [r, g, b, 1.0 - self.transparency]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let material = MaterialDesc::from_node(&SceneNode::new("Material"));
        assert_eq!(material, MaterialDesc::default());
        assert_eq!(material.base_color(), [0.8, 0.8, 0.8, 1.0]);
    }

    #[test]
    fn test_material_fields_and_clamping() {
        let node = SceneNode::new("Material")
            .with_attr("DEF", "Red")
            .with_attr("diffuseColor", "1 0 0")
            .with_attr("transparency", "1.5")
            .with_attr("shininess", "bogus");
        let material = MaterialDesc::from_node(&node);

        assert_eq!(material.name.as_deref(), Some("Red"));
        assert_eq!(material.diffuse_color, [1.0, 0.0, 0.0]);
        assert_eq!(material.transparency, 1.0);
        assert_eq!(material.shininess, 0.2);
        assert_eq!(material.base_color()[3], 0.0);
    }

    #[test]
    fn test_texture_url_is_verbatim() {
        let node = SceneNode::new("ImageTexture")
            .with_attr("url", r#""textures/brick.png" "https://example.com/brick.png""#)
            .with_attr("repeatT", "false");
        let texture = TextureDesc::from_node(&node);

        assert_eq!(texture.url, vec!["textures/brick.png", "https://example.com/brick.png"]);
        assert!(texture.repeat_s);
        assert!(!texture.repeat_t);
    }
}
