//! Vertex declarations, buffer bindings and the vertex data that ties them
//! together.  Each element names the bind index (`source`) of the buffer
//! it lives in, so one `VertexData` may spread its attributes over several
//! parallel buffers.

use std::collections::BTreeMap;

use super::buffer::VertexBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexElementType {
    Float1,
    Float2,
    Float3,
    Float4,
}

impl VertexElementType {
    /// Float type with `count` components, if there is one.
    pub fn from_float_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(Self::Float1),
            2 => Some(Self::Float2),
            3 => Some(Self::Float3),
            4 => Some(Self::Float4),
            _ => None,
        }
    }

    pub fn float_count(self) -> usize {
        match self {
            Self::Float1 => 1,
            Self::Float2 => 2,
            Self::Float3 => 3,
            Self::Float4 => 4,
        }
    }

    pub fn size(self) -> usize {
        self.float_count() * std::mem::size_of::<f32>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexElementSemantic {
    Position,
    Normal,
    TexCoords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexElement {
    pub source: u16,
    pub offset: usize,
    pub element_type: VertexElementType,
    pub semantic: VertexElementSemantic,
    /// Distinguishes repeated semantics, e.g. texture coordinate sets.
    pub index: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexDeclaration {
    elements: Vec<VertexElement>,
}

impl VertexDeclaration {
    pub fn add_element(
        &mut self,
        source: u16,
        offset: usize,
        element_type: VertexElementType,
        semantic: VertexElementSemantic,
        index: u16,
    ) -> &VertexElement {
        self.elements.push(VertexElement {
            source,
            offset,
            element_type,
            semantic,
            index,
        });
        &self.elements[self.elements.len() - 1]
    }

    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// Bytes per vertex in the buffer bound at `source`.
    pub fn vertex_size(&self, source: u16) -> usize {
        self.elements
            .iter()
            .filter(|e| e.source == source)
            .map(|e| e.element_type.size())
            .sum()
    }

    pub fn find_element_by_semantic(
        &self,
        semantic: VertexElementSemantic,
        index: u16,
    ) -> Option<&VertexElement> {
        self.elements
            .iter()
            .find(|e| e.semantic == semantic && e.index == index)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBufferBinding {
    bindings: BTreeMap<u16, VertexBuffer>,
}

impl VertexBufferBinding {
    /// Binds `buffer` at `index`, replacing whatever was bound there.
    pub fn set_binding(&mut self, index: u16, buffer: VertexBuffer) {
        self.bindings.insert(index, buffer);
    }

    pub fn buffer(&self, index: u16) -> Option<&VertexBuffer> {
        self.bindings.get(&index)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &VertexBuffer)> + '_ {
        self.bindings.iter().map(|(i, b)| (*i, b))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexData {
    pub vertex_start: usize,
    pub vertex_count: usize,
    pub vertex_declaration: VertexDeclaration,
    pub vertex_buffer_binding: VertexBufferBinding,
}

impl VertexData {
    /// Contents of the buffer holding `semantic`/`index`, as floats.
    pub fn floats_for(&self, semantic: VertexElementSemantic, index: u16) -> Option<Vec<f32>> {
        let element = self
            .vertex_declaration
            .find_element_by_semantic(semantic, index)?;
        self.vertex_buffer_binding
            .buffer(element.source)
            .map(VertexBuffer::to_f32s)
    }
}
