/// The four top-level pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Gallery,
    Submit,
    Contact,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Gallery, Page::Submit, Page::Contact];

    pub fn id(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Gallery => "gallery",
            Page::Submit => "submit",
            Page::Contact => "contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Gallery => "Gallery",
            Page::Submit => "Submit Art",
            Page::Contact => "Contact",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Gallery => "/gallery",
            Page::Submit => "/submit",
            Page::Contact => "/contact",
        }
    }

    /// Unknown ids land on the home page.
    pub fn from_id(id: &str) -> Page {
        Page::ALL
            .into_iter()
            .find(|page| page.id() == id)
            .unwrap_or_default()
    }
}

/// Page transitions are unguarded: every page is reachable from every page.
pub fn transition(_from: Page, to: Page) -> Page {
    to
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Navigator {
    current: Page,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Page {
        self.current
    }

    /// Move to `to`, returning the page that was left.
    pub fn navigate(&mut self, to: Page) -> Page {
        let previous = self.current;
        self.current = transition(previous, to);
        previous
    }
}
