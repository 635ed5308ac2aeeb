use super::*;

/// Pointer gesture in progress while the select tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectGesture {
    Move { last: ToolPoint },
    Marquee { anchor: ToolPoint, current: ToolPoint },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectPointerOutcome {
    Ignored,
    Selected(u64),
    EditText(u64),
    MarqueeStarted,
}

impl Canvas {
    /// Toggles select mode: every object becomes clickable and marquee
    /// selection is enabled, or everything goes inert and the selection is
    /// dropped.
    pub fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
        for object in &mut self.objects {
            object.set_interactive(enabled);
        }
        if !enabled {
            self.gesture = None;
            self.clear_selection();
        }
    }

    pub const fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    /// Topmost interactive object under `point`.
    pub fn object_at(&self, point: ToolPoint) -> Option<u64> {
        self.objects
            .iter()
            .rev()
            .find(|object| object.is_interactive() && object.hit(point))
            .map(ToolObject::id)
    }

    pub fn select(&mut self, id: u64) -> Result<(), ToolError> {
        if self.object(id).is_none() {
            return Err(ToolError::ObjectNotFound(id));
        }
        self.replace_selection(vec![id]);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.replace_selection(Vec::new());
    }

    pub(super) fn replace_selection(&mut self, ids: Vec<u64>) {
        if self.selection != ids {
            self.selection = ids;
            self.events.push(CanvasEvent::SelectionChanged);
        }
    }

    pub fn selection(&self) -> &[u64] {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub const fn gesture(&self) -> Option<SelectGesture> {
        self.gesture
    }

    pub fn marquee_bounds(&self) -> Option<ToolBounds> {
        match self.gesture {
            Some(SelectGesture::Marquee { anchor, current }) => {
                Some(ToolBounds::from_corners(anchor, current))
            }
            _ => None,
        }
    }

    pub fn select_pointer_down(&mut self, point: ToolPoint) -> SelectPointerOutcome {
        if !self.selection_enabled {
            return SelectPointerOutcome::Ignored;
        }

        let Some(hit) = self.object_at(point) else {
            self.clear_selection();
            self.gesture = Some(SelectGesture::Marquee {
                anchor: point,
                current: point,
            });
            return SelectPointerOutcome::MarqueeStarted;
        };

        if self.selection == [hit] && self.get_text(hit).is_some() {
            if self.enter_text_editing(hit).is_ok() {
                self.gesture = None;
                return SelectPointerOutcome::EditText(hit);
            }
        }

        if !self.selection.contains(&hit) {
            self.replace_selection(vec![hit]);
        }
        self.gesture = Some(SelectGesture::Move { last: point });
        SelectPointerOutcome::Selected(hit)
    }

    pub fn select_pointer_move(&mut self, point: ToolPoint) -> bool {
        match self.gesture {
            Some(SelectGesture::Move { last }) => {
                let delta_x = point.x.saturating_sub(last.x);
                let delta_y = point.y.saturating_sub(last.y);
                if delta_x == 0 && delta_y == 0 {
                    return false;
                }
                let selection = self.selection.clone();
                for object in self
                    .objects
                    .iter_mut()
                    .filter(|object| selection.contains(&object.id()))
                {
                    object.translate(delta_x, delta_y);
                }
                self.gesture = Some(SelectGesture::Move { last: point });
                true
            }
            Some(SelectGesture::Marquee { anchor, .. }) => {
                self.gesture = Some(SelectGesture::Marquee {
                    anchor,
                    current: point,
                });
                true
            }
            None => false,
        }
    }

    /// Ends the gesture; a marquee selects every interactive object it
    /// touches, in stacking order.
    pub fn select_pointer_up(&mut self, point: ToolPoint) {
        self.select_pointer_move(point);
        let Some(SelectGesture::Marquee { anchor, current }) = self.gesture.take() else {
            return;
        };
        if anchor == current {
            return;
        }
        let marquee = ToolBounds::from_corners(anchor, current);
        let hits = self
            .objects
            .iter()
            .filter(|object| object.is_interactive() && object.bounds().intersects(&marquee))
            .map(ToolObject::id)
            .collect::<Vec<_>>();
        self.replace_selection(hits);
    }

    pub fn remove_selected(&mut self) -> Vec<ToolObject> {
        let selected = self.selection.clone();
        selected
            .into_iter()
            .filter_map(|id| self.remove_object(id))
            .collect()
    }

    /// Applies a control edit to every selected object and returns how many
    /// actually changed.
    pub fn apply_style_to_selection(&mut self, change: StyleChange) -> usize {
        let selection = self.selection.clone();
        self.objects
            .iter_mut()
            .filter(|object| selection.contains(&object.id()))
            .map(|object| object.apply_style(change))
            .filter(|changed| *changed)
            .count()
    }
}
