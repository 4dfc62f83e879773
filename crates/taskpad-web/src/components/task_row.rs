use taskpad_core::{
  Entry,
  EntryMode
};
use yew::{
  Html,
  Properties,
  classes,
  function_component,
  html
};

use crate::dom::{
  ACTION_CANCEL,
  ACTION_DELETE,
  ACTION_EDIT,
  ACTION_EDIT_INPUT,
  ACTION_SAVE,
  ACTION_TOGGLE,
  checkbox_dom_id,
  edit_input_dom_id
};

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub entry: Entry
}

/// One list entry. Carries no callbacks:
/// the list container reads the
/// `data-action` markers on click.
#[function_component(TaskRow)]
pub fn task_row(
  props: &TaskRowProps
) -> Html {
  let id = props.entry.id;
  let id_attr = id.to_string();
  let style = format!(
    "animation: fadeIn 0.3s ease-out; \
     animation-delay: {}ms",
    props.entry.delay_ms
  );

  let body = match &props.entry.mode {
    | EntryMode::Display {
      text,
      checked,
      struck,
      editable
    } => {
      html! {
          <>
              <div class="task-main">
                  <input
                      type="checkbox"
                      id={checkbox_dom_id(id)}
                      data-action={ACTION_TOGGLE}
                      data-id={id_attr.clone()}
                      checked={*checked}
                  />
                  <label
                      class={classes!("task-text", struck.then_some("completed"), editable.then_some("editable"))}
                      data-action={editable.then_some(ACTION_EDIT)}
                      data-id={id_attr.clone()}
                  >
                      { text.clone() }
                  </label>
              </div>
              <button
                  class="task-delete"
                  aria-label="Delete task"
                  data-action={ACTION_DELETE}
                  data-id={id_attr}
              >
                  { "×" }
              </button>
          </>
      }
    }
    | EntryMode::Edit {
      draft,
      checked
    } => {
      html! {
          <>
              <div class="task-main">
                  <input type="checkbox" checked={*checked} disabled=true />
                  <input
                      type="text"
                      class="task-edit"
                      id={edit_input_dom_id(id)}
                      data-action={ACTION_EDIT_INPUT}
                      data-id={id_attr.clone()}
                      value={draft.clone()}
                  />
              </div>
              <div class="task-edit-actions">
                  <button
                      class="task-save"
                      aria-label="Save task"
                      data-action={ACTION_SAVE}
                      data-id={id_attr.clone()}
                  >
                      { "✓" }
                  </button>
                  <button
                      class="task-cancel"
                      aria-label="Cancel edit"
                      data-action={ACTION_CANCEL}
                      data-id={id_attr}
                  >
                      { "↺" }
                  </button>
              </div>
          </>
      }
    }
  };

  html! {
      <li class="task-item" style={style}>
          { body }
      </li>
  }
}
