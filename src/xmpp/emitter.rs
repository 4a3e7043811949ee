/*
** This file is a part of Nucleus (XMPP library for clients and components)
** Copyright (C) 2016-2026 The Nucleus developers
**
** Nucleus is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::session::SessionEvent;

/// Discriminant of [SessionEvent] used for listener registration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventKind {
    Connected,
    StreamOpen,
    Element,
    Ready,
    Error,
    Closed,
}

impl SessionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::Connected => EventKind::Connected,
            SessionEvent::StreamOpen(_) => EventKind::StreamOpen,
            SessionEvent::Element(_) => EventKind::Element,
            SessionEvent::Ready => EventKind::Ready,
            SessionEvent::Error(_) => EventKind::Error,
            SessionEvent::Closed => EventKind::Closed,
        }
    }
}

type EventCallback = Box<dyn FnMut(&SessionEvent)>;

struct Listener {
    kind: EventKind,
    once: bool,
    callback: EventCallback,
}

/// Callback registry for session events.
#[derive(Default)]
pub struct EventListeners {
    listeners: Vec<Listener>,
}

impl EventListeners {
    pub fn new() -> EventListeners {
        EventListeners {
            listeners: Vec::new(),
        }
    }

    /// Registers a callback for every event of the given kind.
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.listeners.push(Listener {
            kind,
            once: false,
            callback: Box::new(callback),
        });
    }

    /// Registers a callback invoked at most once.
    pub fn once<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.listeners.push(Listener {
            kind,
            once: true,
            callback: Box::new(callback),
        });
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn emit(&mut self, event: &SessionEvent) {
        let kind = event.kind();
        let mut pos = 0;
        while pos < self.listeners.len() {
            if self.listeners[pos].kind != kind {
                pos += 1;
                continue;
            }
            if self.listeners[pos].once {
                // Removed before the call so it can never fire twice,
                // even if the callback emits recursively.
                let mut listener = self.listeners.remove(pos);
                (listener.callback)(event);
            } else {
                (self.listeners[pos].callback)(event);
                pos += 1;
            }
        }
    }
}
