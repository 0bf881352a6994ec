//! Transient toast notifications

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Destructive,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
    created: Instant,
}

/// Queue of recent toasts, oldest first
#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Toast>,
    lifetime: Duration,
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            lifetime,
        }
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(ToastKind::Info, title.into(), description.into());
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(ToastKind::Destructive, title.into(), description.into());
    }

    fn push(&mut self, kind: ToastKind, title: String, description: String) {
        self.items.push_back(Toast {
            kind,
            title,
            description,
            created: Instant::now(),
        });
        while self.items.len() > MAX_TOASTS {
            self.items.pop_front();
        }
    }

    /// Drop expired toasts
    pub fn prune(&mut self) {
        let lifetime = self.lifetime;
        self.items.retain(|t| t.created.elapsed() < lifetime);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune();
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 40.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.items {
                    let (fill, text) = match toast.kind {
                        ToastKind::Info => (egui::Color32::from_rgb(40, 44, 52), egui::Color32::WHITE),
                        ToastKind::Destructive => {
                            (egui::Color32::from_rgb(180, 35, 35), egui::Color32::WHITE)
                        }
                    };
                    egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                        ui.set_width(320.0);
                        ui.label(egui::RichText::new(&toast.title).strong().color(text));
                        ui.label(egui::RichText::new(&toast.description).color(text));
                    });
                    ui.add_space(6.0);
                }
            });

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_bounded() {
        let mut toasts = Toasts::default();
        for i in 0..8 {
            toasts.info(format!("t{}", i), "");
        }
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts.iter().next().map(|t| t.title.as_str()), Some("t3"));
    }

    #[test]
    fn test_expired_toasts_pruned() {
        let mut toasts = Toasts::new(Duration::ZERO);
        toasts.error("Error", "Patient not found");
        toasts.prune();
        assert_eq!(toasts.len(), 0);
    }
}
