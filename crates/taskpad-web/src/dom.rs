//! Reads delegated list and filter
//! events back into core interactions.
//!
//! Rows mark their controls with
//! `data-action` and `data-id`; nothing
//! else about the markup is relied on.

use taskpad_core::{
  ClickTarget,
  Interaction,
  Key,
  KeyTarget,
  TaskId
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  HtmlInputElement,
  KeyboardEvent,
  MouseEvent
};
use yew::TargetCast;

pub const ACTION_DELETE: &str =
  "delete";
pub const ACTION_EDIT: &str = "edit";
pub const ACTION_SAVE: &str = "save";
pub const ACTION_CANCEL: &str =
  "cancel";
pub const ACTION_TOGGLE: &str =
  "toggle";
pub const ACTION_EDIT_INPUT: &str =
  "edit-input";

pub fn checkbox_dom_id(
  id: TaskId
) -> String {
  format!("task{id}")
}

pub fn edit_input_dom_id(
  id: TaskId
) -> String {
  format!("edit-{id}")
}

pub fn edit_input(
  id: TaskId
) -> Option<HtmlInputElement> {
  web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document.get_element_by_id(
        &edit_input_dom_id(id)
      )
    })
    .and_then(|element| {
      element
        .dyn_into::<HtmlInputElement>()
        .ok()
    })
}

/// Every marked control enclosing the
/// click target. Priority is decided by
/// the core dispatch table.
pub fn list_click(
  event: &MouseEvent
) -> Interaction {
  let Some(target) =
    event.target_dyn_into::<Element>()
  else {
    return Interaction::ListClick {
      hits: vec![]
    };
  };

  let mut hits = Vec::new();
  for action in LIST_ACTIONS {
    let Some(control) =
      closest_action(&target, action)
    else {
      continue;
    };
    let Some(id) = parse_task_id(
      control.get_attribute("data-id")
    ) else {
      tracing::warn!(
        action,
        "list control without a \
         usable data-id"
      );
      continue;
    };

    if let Some(hit) =
      click_target(action, id, |id| {
        edit_input(id)
          .map(|input| input.value())
          .unwrap_or_default()
      })
    {
      hits.push(hit);
    }
  }

  Interaction::ListClick { hits }
}

pub fn list_key(
  event: &KeyboardEvent
) -> Interaction {
  let key = Key::from_name(&event.key());
  let input = event
    .target_dyn_into::<HtmlInputElement>();
  let target = match input {
    | Some(input) => {
      key_target(
        input
          .get_attribute("data-action")
          .as_deref(),
        input.get_attribute("data-id"),
        input.value()
      )
    }
    | None => KeyTarget::Other
  };

  Interaction::ListKey { key, target }
}

/// Filter controls are identified by
/// their label. Each button carries its
/// own, so no DOM lookup is needed.
pub fn filter_click(
  label: &str
) -> Interaction {
  Interaction::FilterClick {
    label: label.to_string()
  }
}

const LIST_ACTIONS: [&str; 5] = [
  ACTION_TOGGLE,
  ACTION_EDIT,
  ACTION_SAVE,
  ACTION_CANCEL,
  ACTION_DELETE
];

/// Maps a `data-action` value on a list
/// control. `edit_value` is only read for
/// the save button.
fn click_target(
  action: &str,
  id: TaskId,
  edit_value: impl FnOnce(TaskId) -> String
) -> Option<ClickTarget> {
  match action {
    | ACTION_DELETE => {
      Some(ClickTarget::Delete(id))
    }
    | ACTION_EDIT => {
      Some(ClickTarget::Label(id))
    }
    | ACTION_SAVE => {
      Some(ClickTarget::Save {
        id,
        value: edit_value(id)
      })
    }
    | ACTION_CANCEL => {
      Some(ClickTarget::Cancel(id))
    }
    | ACTION_TOGGLE => {
      Some(ClickTarget::Checkbox(id))
    }
    | _ => None
  }
}

fn key_target(
  action: Option<&str>,
  raw_id: Option<String>,
  value: String
) -> KeyTarget {
  if action != Some(ACTION_EDIT_INPUT) {
    return KeyTarget::Other;
  }
  match parse_task_id(raw_id) {
    | Some(id) => {
      KeyTarget::EditInput { id, value }
    }
    | None => KeyTarget::Other
  }
}

fn closest_action(
  element: &Element,
  action: &str
) -> Option<Element> {
  element
    .closest(&format!(
      "[data-action=\"{action}\"]"
    ))
    .ok()
    .flatten()
}

fn parse_task_id(
  raw: Option<String>
) -> Option<TaskId> {
  raw.and_then(|raw| raw.parse().ok())
}
