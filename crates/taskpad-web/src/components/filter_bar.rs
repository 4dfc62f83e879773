use taskpad_core::FilterButton;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub buttons:  Vec<FilterButton>,
  /// Receives the label of the clicked
  /// button.
  pub on_click: Callback<String>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  html! {
      <div class="filters">
          {
              for props.buttons.iter().map(|button| {
                  let label = button.label;
                  html! {
                      <button
                          type="button"
                          class={classes!("filter", button.selected.then_some("selected"))}
                          onclick={props.on_click.reform(move |_| label.to_string())}
                      >
                          { label }
                      </button>
                  }
              })
          }
      </div>
  }
}
