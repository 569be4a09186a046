//! Named shader parameters.
//!
//! A [`UniformSet`] is the host-side mirror of the uniform block a procedural
//! shader reads every frame. Each entry is a tagged [`UniformValue`] so a
//! scalar can never be overwritten by a vector or a colour. The set also owns
//! the memory layout: [`UniformSet::to_bytes`] packs the values following the
//! WGSL uniform address-space rules and [`UniformSet::wgsl_struct`] emits the
//! matching struct declaration, so host and shader always agree on offsets.

use std::fmt;

use thiserror::Error;

/// An sRGB colour with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a packed `0xRRGGBB` value.
    pub fn from_rgb_u32(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Parse `#rrggbb`, `rrggbb` or `0xrrggbb`.
    pub fn from_hex(text: &str) -> Result<Self, UniformError> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(UniformError::InvalidHex(text.to_string()));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| UniformError::InvalidHex(text.to_string()))?;
        Ok(Self::from_rgb_u32(packed))
    }

    pub fn to_hex(&self) -> String {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    /// Linear-space components, which is what the shaders blend in.
    pub fn to_linear(&self) -> [f32; 3] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        ]
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        let [r, g, b] = c.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// The shape of a uniform, independent of its current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Scalar,
    Vec2,
    Color,
}

impl UniformKind {
    /// Alignment in bytes inside a uniform buffer.
    pub fn align(self) -> usize {
        match self {
            UniformKind::Scalar => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Color => 16,
        }
    }

    /// Size in bytes inside a uniform buffer.
    pub fn size(self) -> usize {
        match self {
            UniformKind::Scalar => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Color => 12,
        }
    }

    pub fn wgsl_type(self) -> &'static str {
        match self {
            UniformKind::Scalar => "f32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Color => "vec3<f32>",
        }
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniformKind::Scalar => "scalar",
            UniformKind::Vec2 => "vec2",
            UniformKind::Color => "color",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Scalar(f32),
    Vec2([f32; 2]),
    Color(Color),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Scalar(_) => UniformKind::Scalar,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Color(_) => UniformKind::Color,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Scalar(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Color> for UniformValue {
    fn from(c: Color) -> Self {
        UniformValue::Color(c)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UniformError {
    #[error("no uniform named `{0}`")]
    Unknown(String),
    #[error("uniform `{name}` is a {expected}, got a {found}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
    #[error("uniform `{name}` has no component {index}")]
    Component { name: String, index: usize },
    #[error("`{0}` is not a #rrggbb colour")]
    InvalidHex(String),
}

/// Ordered collection of named uniforms.
///
/// Declaration order is layout order, so the set must be fully declared before
/// a pipeline is built from it. Later writes only change values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformSet {
    entries: Vec<(String, UniformValue)>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a uniform. Declaring an existing name replaces it in place.
    pub fn with(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut UniformValue, UniformError> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| UniformError::Unknown(name.to_string()))
    }

    fn lookup(&self, name: &str) -> Result<&UniformValue, UniformError> {
        self.get(name)
            .ok_or_else(|| UniformError::Unknown(name.to_string()))
    }

    /// Overwrite a uniform. The new value must have the declared kind.
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let slot = self.slot_mut(name)?;
        if slot.kind() != value.kind() {
            return Err(UniformError::KindMismatch {
                name: name.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    pub fn set_scalar(&mut self, name: &str, value: f32) -> Result<(), UniformError> {
        self.set(name, UniformValue::Scalar(value))
    }

    pub fn set_vec2(&mut self, name: &str, value: [f32; 2]) -> Result<(), UniformError> {
        self.set(name, UniformValue::Vec2(value))
    }

    pub fn set_vec2_component(
        &mut self,
        name: &str,
        index: usize,
        value: f32,
    ) -> Result<(), UniformError> {
        match self.slot_mut(name)? {
            UniformValue::Vec2(v) if index < 2 => {
                v[index] = value;
                Ok(())
            }
            UniformValue::Vec2(_) => Err(UniformError::Component {
                name: name.to_string(),
                index,
            }),
            other => Err(UniformError::KindMismatch {
                name: name.to_string(),
                expected: other.kind(),
                found: UniformKind::Vec2,
            }),
        }
    }

    pub fn set_color(&mut self, name: &str, value: Color) -> Result<(), UniformError> {
        self.set(name, UniformValue::Color(value))
    }

    pub fn scalar(&self, name: &str) -> Result<f32, UniformError> {
        match self.lookup(name)? {
            UniformValue::Scalar(v) => Ok(*v),
            other => Err(mismatch(name, other.kind(), UniformKind::Scalar)),
        }
    }

    pub fn vec2(&self, name: &str) -> Result<[f32; 2], UniformError> {
        match self.lookup(name)? {
            UniformValue::Vec2(v) => Ok(*v),
            other => Err(mismatch(name, other.kind(), UniformKind::Vec2)),
        }
    }

    pub fn color(&self, name: &str) -> Result<Color, UniformError> {
        match self.lookup(name)? {
            UniformValue::Color(c) => Ok(*c),
            other => Err(mismatch(name, other.kind(), UniformKind::Color)),
        }
    }

    /// Byte offset of every entry, in declaration order.
    pub fn offsets(&self) -> Vec<usize> {
        let mut cursor = 0usize;
        self.entries
            .iter()
            .map(|(_, value)| {
                let kind = value.kind();
                let offset = cursor.next_multiple_of(kind.align());
                cursor = offset + kind.size();
                offset
            })
            .collect()
    }

    /// Buffer size in bytes, rounded up to 16 and never zero.
    pub fn byte_size(&self) -> usize {
        let end = self
            .entries
            .last()
            .zip(self.offsets().last())
            .map_or(0, |((_, value), offset)| offset + value.kind().size());
        end.next_multiple_of(16).max(16)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.byte_size()];
        for ((_, value), offset) in self.entries.iter().zip(self.offsets()) {
            let mut write = |floats: &[f32]| {
                let raw: &[u8] = bytemuck::cast_slice(floats);
                bytes[offset..offset + raw.len()].copy_from_slice(raw);
            };
            match value {
                UniformValue::Scalar(v) => write(&[*v]),
                UniformValue::Vec2(v) => write(v),
                UniformValue::Color(c) => write(&c.to_linear()),
            }
        }
        bytes
    }

    /// WGSL declaration of a struct laid out exactly like [`Self::to_bytes`].
    pub fn wgsl_struct(&self, struct_name: &str) -> String {
        let mut out = format!("struct {struct_name} {{\n");
        for (name, value) in &self.entries {
            out.push_str(&format!("    {name}: {},\n", value.kind().wgsl_type()));
        }
        if self.entries.is_empty() {
            out.push_str("    _unused: f32,\n");
        }
        out.push_str("};\n");
        out
    }
}

fn mismatch(name: &str, expected: UniformKind, found: UniformKind) -> UniformError {
    UniformError::KindMismatch {
        name: name.to_string(),
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sea() -> UniformSet {
        UniformSet::new()
            .with("time", 0.0_f32)
            .with("frequency", [4.0_f32, 1.5])
            .with("depth_color", Color::from_rgb_u32(0x186691))
            .with("color_offset", 0.08_f32)
    }

    #[test]
    fn parses_hex_in_all_accepted_spellings() {
        let expected = Color::from_rgb_u32(0x9bd8ff);
        assert_eq!(Color::from_hex("#9bd8ff").unwrap(), expected);
        assert_eq!(Color::from_hex("9BD8FF").unwrap(), expected);
        assert_eq!(Color::from_hex("0x9bd8ff").unwrap(), expected);
        assert_eq!(expected.to_hex(), "#9bd8ff");
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#12345", "#1234567", "#zzzzzz", "+12345"] {
            assert_eq!(
                Color::from_hex(bad),
                Err(UniformError::InvalidHex(bad.to_string()))
            );
        }
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::WHITE.to_linear(), [1.0, 1.0, 1.0]);
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let mid = Color::new(0.5, 0.5, 0.5).to_linear();
        assert_relative_eq!(mid[0], 0.214_041_14, epsilon = 1e-6);
    }

    #[test]
    fn refuses_values_of_the_wrong_shape() {
        let mut uniforms = sea();
        assert_eq!(
            uniforms.set_scalar("frequency", 1.0),
            Err(UniformError::KindMismatch {
                name: "frequency".into(),
                expected: UniformKind::Vec2,
                found: UniformKind::Scalar,
            })
        );
        assert_eq!(uniforms.vec2("frequency").unwrap(), [4.0, 1.5]);
        assert!(matches!(
            uniforms.set_vec2_component("time", 0, 1.0),
            Err(UniformError::KindMismatch { .. })
        ));
        assert_eq!(
            uniforms.set_vec2_component("frequency", 2, 1.0),
            Err(UniformError::Component {
                name: "frequency".into(),
                index: 2
            })
        );
        assert_eq!(
            uniforms.set_scalar("missing", 1.0),
            Err(UniformError::Unknown("missing".into()))
        );
    }

    #[test]
    fn writes_go_through() {
        let mut uniforms = sea();
        uniforms.set_scalar("time", 2.5).unwrap();
        uniforms.set_vec2_component("frequency", 1, 9.0).unwrap();
        uniforms.set_color("depth_color", Color::WHITE).unwrap();
        assert_eq!(uniforms.scalar("time").unwrap(), 2.5);
        assert_eq!(uniforms.vec2("frequency").unwrap(), [4.0, 9.0]);
        assert_eq!(uniforms.color("depth_color").unwrap(), Color::WHITE);
    }

    #[test]
    fn redeclaring_keeps_position() {
        let uniforms = sea().with("time", 3.0_f32);
        assert_eq!(uniforms.len(), 4);
        assert_eq!(uniforms.iter().next(), Some(("time", &UniformValue::Scalar(3.0))));
    }

    #[test]
    fn layout_follows_uniform_alignment_rules() {
        let uniforms = sea();
        // f32 @0, vec2 @8, vec3 @16 (12 bytes), f32 @28
        assert_eq!(uniforms.offsets(), vec![0, 8, 16, 28]);
        assert_eq!(uniforms.byte_size(), 32);
        assert_eq!(UniformSet::new().byte_size(), 16);
    }

    #[test]
    fn packs_values_at_their_offsets() {
        let mut uniforms = sea();
        uniforms.set_scalar("time", 1.25).unwrap();
        uniforms.set_color("depth_color", Color::WHITE).unwrap();
        let bytes = uniforms.to_bytes();
        let floats: Vec<f32> = bytemuck::pod_collect_to_vec(&bytes);
        assert_eq!(floats[0], 1.25);
        assert_eq!(floats[1], 0.0);
        assert_eq!(&floats[2..4], &[4.0, 1.5]);
        assert_eq!(&floats[4..7], &[1.0, 1.0, 1.0]);
        assert_eq!(floats[7], 0.08);
    }

    #[test]
    fn generates_matching_wgsl_struct() {
        assert_eq!(
            sea().wgsl_struct("Params"),
            "struct Params {\n    time: f32,\n    frequency: vec2<f32>,\n    depth_color: vec3<f32>,\n    color_offset: f32,\n};\n"
        );
    }
}
