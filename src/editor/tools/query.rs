use super::*;

impl Canvas {
    pub fn object(&self, id: u64) -> Option<&ToolObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    pub fn get_text(&self, id: u64) -> Option<&TextElement> {
        self.find_object_ref(id, ToolObject::as_text)
    }

    pub fn get_text_mut(&mut self, id: u64) -> Option<&mut TextElement> {
        self.find_object_mut(id, ToolObject::as_text_mut)
    }

    pub const fn editing_text_id(&self) -> Option<u64> {
        self.editing_text
    }

    pub fn editing_text(&self) -> Option<&TextElement> {
        self.editing_text.and_then(|id| self.get_text(id))
    }

    pub fn is_editing_text(&self) -> bool {
        self.editing_text().is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
