//! PBR factor bag carried by materials of the CPU backend.

/// PBR metallic-roughness factor stored on a [`CpuMaterial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialSemantic {
    /// Linear RGBA multiplier.
    BaseColorFactor,
    MetallicFactor,
    RoughnessFactor,
}

impl MaterialSemantic {
    pub const ALL: [Self; 3] = [
        Self::BaseColorFactor,
        Self::MetallicFactor,
        Self::RoughnessFactor,
    ];

    /// Value used when a material does not set this factor.
    pub fn default_value(self) -> MaterialValue {
        match self {
            Self::BaseColorFactor => MaterialValue::Vec4([1.0; 4]),
            Self::MetallicFactor | Self::RoughnessFactor => MaterialValue::Float(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialValue {
    Float(f32),
    Vec4([f32; 4]),
}

/// Named set of factors, at most one value per semantic.
///
/// Unset factors read as [`MaterialSemantic::default_value`], so an empty
/// material renders as plain white, fully metallic and fully rough.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuMaterial {
    pub name: Option<String>,
    properties: Vec<(MaterialSemantic, MaterialValue)>,
}

impl CpuMaterial {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            properties: Vec::new(),
        }
    }

    /// Set `semantic`, replacing any earlier value.
    pub fn set(&mut self, semantic: MaterialSemantic, value: MaterialValue) {
        match self.properties.iter_mut().find(|(s, _)| *s == semantic) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((semantic, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, semantic: MaterialSemantic, value: MaterialValue) -> Self {
        self.set(semantic, value);
        self
    }

    /// Explicitly set value of `semantic`.
    pub fn get(&self, semantic: MaterialSemantic) -> Option<MaterialValue> {
        self.properties
            .iter()
            .find(|(s, _)| *s == semantic)
            .map(|(_, value)| *value)
    }

    /// Effective value of `semantic`, falling back to its default.
    pub fn value(&self, semantic: MaterialSemantic) -> MaterialValue {
        self.get(semantic)
            .unwrap_or_else(|| semantic.default_value())
    }

    pub fn factor(&self, semantic: MaterialSemantic) -> Option<f32> {
        match self.value(semantic) {
            MaterialValue::Float(v) => Some(v),
            MaterialValue::Vec4(_) => None,
        }
    }

    pub fn color(&self, semantic: MaterialSemantic) -> Option<[f32; 4]> {
        match self.value(semantic) {
            MaterialValue::Vec4(v) => Some(v),
            MaterialValue::Float(_) => None,
        }
    }

    /// Explicitly set factors in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (MaterialSemantic, MaterialValue)> + '_ {
        self.properties.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_factors_use_defaults() {
        let material = CpuMaterial::new(Some("Blank".into()));
        assert_eq!(material.properties().count(), 0);
        for semantic in MaterialSemantic::ALL {
            assert_eq!(material.get(semantic), None);
            assert_eq!(material.value(semantic), semantic.default_value());
        }
        assert_eq!(
            material.color(MaterialSemantic::BaseColorFactor),
            Some([1.0; 4])
        );
        assert_eq!(material.factor(MaterialSemantic::MetallicFactor), Some(1.0));
    }

    #[test]
    fn set_replaces_earlier_value() {
        let material = CpuMaterial::default()
            .with(MaterialSemantic::RoughnessFactor, MaterialValue::Float(0.2))
            .with(MaterialSemantic::MetallicFactor, MaterialValue::Float(0.0))
            .with(MaterialSemantic::RoughnessFactor, MaterialValue::Float(0.7));

        assert_eq!(material.factor(MaterialSemantic::RoughnessFactor), Some(0.7));
        let semantics: Vec<_> = material.properties().map(|(s, _)| s).collect();
        assert_eq!(
            semantics,
            vec![MaterialSemantic::RoughnessFactor, MaterialSemantic::MetallicFactor]
        );
    }

    #[test]
    fn mismatched_kind_reads_as_none() {
        let material = CpuMaterial::default()
            .with(MaterialSemantic::MetallicFactor, MaterialValue::Vec4([0.0; 4]));
        assert_eq!(material.factor(MaterialSemantic::MetallicFactor), None);
        assert_eq!(material.color(MaterialSemantic::RoughnessFactor), None);
    }
}
