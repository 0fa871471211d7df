//! `favorite`: flip `aria-pressed` and mirror it into the favorites record

use cc_dom::{MouseEvent, NodeId};

use super::{data_param, set_aria_pressed};
use crate::favorites::Favorites;
use crate::feedback::show_temp_message;
use crate::{ActionError, Page};

pub(crate) fn favorite(page: &Page, button: NodeId, _event: &mut MouseEvent) -> Result<(), ActionError> {
    let was_pressed = page.document().get_attribute(button, "aria-pressed") == Some("true");
    set_aria_pressed(page, button, !was_pressed)?;

    let messages = &page.config().messages;
    let text = if was_pressed { &messages.favorite_removed } else { &messages.favorite_added };
    show_temp_message(page, button, text);

    if let Some(key) = data_param(page, button, "key") {
        Favorites::for_page(page).set(&key, !was_pressed)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_dom::Document;
    use cc_platform::{Config, KeyValueStore, Navigator, Storage};
    use std::rc::Rc;

    fn setup(key: Option<&str>) -> (Rc<Page>, NodeId, Rc<Storage>) {
        let mut doc = Document::new("https://cifras.example/");
        let button = doc.create_element("button");
        if let Some(key) = key {
            doc.set_attribute(button, "data-key", key).unwrap();
        }
        doc.append_child(doc.body(), button).unwrap();
        let storage = Rc::new(Storage::session());
        let navigator = Navigator::minimal().with_local_storage(storage.clone());
        (Page::new(doc, navigator, Config::default()), button, storage)
    }

    fn click(page: &Page, button: NodeId) -> Result<(), ActionError> {
        let mut event = MouseEvent::click(button, 0.0, 0.0);
        favorite(page, button, &mut event)
    }

    #[test]
    fn test_toggle_persists() {
        let (page, button, _) = setup(Some("song-42"));
        let favorites = Favorites::for_page(&page);

        click(&page, button).unwrap();
        assert_eq!(page.document().get_attribute(button, "aria-pressed"), Some("true"));
        assert!(page.document().inner_text(button).contains("Adicionado aos favoritos"));
        assert!(favorites.contains("song-42").unwrap());

        click(&page, button).unwrap();
        assert_eq!(page.document().get_attribute(button, "aria-pressed"), Some("false"));
        assert!(page.document().inner_text(button).contains("Removido dos favoritos"));
        assert!(!favorites.contains("song-42").unwrap());
    }

    #[test]
    fn test_without_key_only_toggles() {
        let (page, button, storage) = setup(None);

        click(&page, button).unwrap();
        assert_eq!(page.document().get_attribute(button, "aria-pressed"), Some("true"));
        assert_eq!(storage.get_item("favs::cifras").unwrap(), None);
    }

    #[test]
    fn test_corrupt_record_fails_after_toggle() {
        let (page, button, storage) = setup(Some("song-42"));
        storage.set_item("favs::cifras", "{oops").unwrap();

        assert!(matches!(click(&page, button), Err(ActionError::Json(_))));
        assert_eq!(page.document().get_attribute(button, "aria-pressed"), Some("true"));
    }
}
