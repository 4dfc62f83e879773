use gloo::console::log;
use taskpad_core::{
  AppConfig,
  Command,
  Controller,
  Interaction,
  ViewModel
};
use web_sys::{
  HtmlInputElement,
  KeyboardEvent,
  MouseEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_mut_ref,
  use_node_ref,
  use_state
};

use crate::components::{
  FilterBar,
  TaskRow
};
use crate::dom;
use crate::storage::BrowserStore;

const TASKPAD_CONFIG_TOML: &str =
  include_str!("../assets/taskpad.toml");

fn load_config() -> AppConfig {
  match AppConfig::from_toml_str(
    TASKPAD_CONFIG_TOML
  ) {
    | Ok(cfg) => cfg,
    | Err(error) => {
      tracing::error!(
        error = %format!("{error:#}"),
        "failed parsing bundled \
         config; using defaults"
      );
      AppConfig::default()
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let view =
    use_state(ViewModel::default);
  let input_ref = use_node_ref();

  let controller = {
    let set_view = view.setter();
    use_mut_ref(move || {
      let cfg = load_config();
      let backend = BrowserStore::detect();
      tracing::info!(
        backend = backend.kind(),
        storage_key = %cfg.storage_key,
        entry_stagger_ms =
          cfg.entry_stagger_ms,
        "opening task list"
      );
      Controller::open(
        backend,
        &cfg,
        move |next| set_view.set(next)
      )
    })
  };

  {
    let controller = controller.clone();
    use_effect_with((), move |_| {
      controller
        .borrow_mut()
        .render_now();
      || ()
    });
  }

  {
    use_effect_with(
      view.focus,
      move |focus| {
        if let Some(id) = *focus {
          match dom::edit_input(id) {
            | Some(input) => {
              if let Err(err) =
                input.focus()
              {
                tracing::warn!(
                  id,
                  error = ?err,
                  "failed focusing \
                   edit input"
                );
              }
              input.select();
            }
            | None => {
              tracing::warn!(
                id,
                "edit input missing \
                 after render"
              );
            }
          }
        }
        || ()
      }
    );
  }

  let on_submit = {
    let controller = controller.clone();
    let input_ref = input_ref.clone();
    Callback::from(
      move |e: SubmitEvent| {
        e.prevent_default();
        let Some(input) = input_ref
          .cast::<HtmlInputElement>()
        else {
          tracing::warn!(
            "new task input not mounted"
          );
          return;
        };

        let outcome = controller
          .borrow_mut()
          .handle(Interaction::Submit {
            value: input.value()
          });
        if outcome.clear_input {
          input.set_value("");
        }
      }
    )
  };

  let on_list_click = {
    let controller = controller.clone();
    Callback::from(
      move |e: MouseEvent| {
        let interaction =
          dom::list_click(&e);
        let outcome = controller
          .borrow_mut()
          .handle(interaction);
        if let Some(command) =
          outcome.command
        {
          log_command(
            "list.click",
            &command
          );
        }
      }
    )
  };

  let on_list_keydown = {
    let controller = controller.clone();
    Callback::from(
      move |e: KeyboardEvent| {
        let interaction =
          dom::list_key(&e);
        let outcome = controller
          .borrow_mut()
          .handle(interaction);
        if outcome.command.is_some() {
          e.prevent_default();
        }
      }
    )
  };

  let on_filter_click = {
    let controller = controller.clone();
    Callback::from(
      move |label: String| {
        let outcome = controller
          .borrow_mut()
          .handle(dom::filter_click(
            &label
          ));
        if let Some(command) =
          outcome.command
        {
          log_command(
            "filter.click",
            &command
          );
        }
      }
    )
  };

  html! {
      <main class="taskpad">
          <form class="task-form" onsubmit={on_submit}>
              <input
                  ref={input_ref}
                  type="text"
                  placeholder="Add a task"
                  autocomplete="off"
              />
              <button type="submit">{ "ADD" }</button>
          </form>
          <ul class="task-list" onclick={on_list_click} onkeydown={on_list_keydown}>
              {
                  for view.entries.iter().cloned().map(|entry| html! {
                      <TaskRow key={entry.id.to_string()} entry={entry.clone()} />
                  })
              }
          </ul>
          <footer class="task-footer">
              <p class="status">{ view.status.clone() }</p>
              <FilterBar buttons={view.filters.clone()} on_click={on_filter_click} />
          </footer>
      </main>
  }
}

/// Mirrors dispatched commands to the
/// browser console.
fn log_command(
  source: &str,
  command: &Command
) {
  tracing::debug!(
    source,
    ?command,
    "command dispatched"
  );
  log!(format!(
    "[taskpad] {source}: {command:?}"
  ));
}
