//! 记录进度的模态对话框

use crate::goals::GoalsStore;
use goaltracker_shared::protocol::CreateProgressRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ProgressDialog(goal_id: u64, #[prop(into)] goal_title: String, store: GoalsStore) -> impl IntoView {
    let (open, set_open) = signal(false);
    let (saving, set_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    // 表单字段
    let (description, set_description) = signal(String::new());
    let (percentage, set_percentage) = signal(0u8);
    let (notes, set_notes) = signal(String::new());
    let (next_steps, set_next_steps) = signal(String::new());

    let reset_form = move || {
        set_description.set(String::new());
        set_percentage.set(0);
        set_notes.set(String::new());
        set_next_steps.set(String::new());
        set_error_msg.set(None);
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        set_error_msg.set(None);

        let req = CreateProgressRequest {
            goal_id,
            description: description.get_untracked(),
            percentage: percentage.get_untracked(),
            notes: notes.get_untracked(),
            next_steps: next_steps.get_untracked(),
            ..Default::default()
        };

        spawn_local(async move {
            match store.add_progress(req).await {
                Ok(_) => {
                    set_open.set(false);
                    reset_form();
                }
                Err(_) => {
                    // 失败时对话框保持打开，用户可修正后重试
                    set_error_msg.set(Some("Failed to record progress".to_string()));
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        // 触发按钮
        <button class="btn btn-ghost btn-xs" on:click=move |_| set_open.set(true)>
            "Log progress"
        </button>

        // 模态框内容
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Log progress"</h3>
                <p class="py-2 text-base-content/70">{goal_title}</p>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <form on:submit=on_submit class="space-y-4">
                    <div class="form-control">
                        <label for="progress_description" class="label">
                            <span class="label-text">"What did you do?"</span>
                        </label>
                        <input id="progress_description" required
                            type="text"
                            placeholder="Finished chapter 3 of the course"
                            on:input=move |ev| set_description.set(event_target_value(&ev))
                            prop:value=description
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="form-control">
                        <label for="progress_percentage" class="label">
                            <span class="label-text">"Overall completion (%)"</span>
                        </label>
                        <input id="progress_percentage" required
                            type="number" min="0" max="100"
                            on:input=move |ev| {
                                if let Ok(val) = event_target_value(&ev).parse::<u8>() {
                                    set_percentage.set(val);
                                }
                            }
                            prop:value=move || percentage.get().to_string()
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="form-control">
                        <label for="progress_notes" class="label">
                            <span class="label-text">"Notes (optional)"</span>
                        </label>
                        <textarea id="progress_notes"
                            placeholder="Anything worth remembering"
                            on:input=move |ev| set_notes.set(event_target_value(&ev))
                            prop:value=notes
                            class="textarea textarea-bordered w-full"
                        ></textarea>
                    </div>

                    <div class="form-control">
                        <label for="progress_next" class="label">
                            <span class="label-text">"Next steps (optional)"</span>
                        </label>
                        <input id="progress_next"
                            type="text"
                            placeholder="Start the practice project"
                            on:input=move |ev| set_next_steps.set(event_target_value(&ev))
                            prop:value=next_steps
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_open.set(false)>"Cancel"</button>
                        <button type="submit" disabled=move || saving.get() class="btn btn-primary">
                            {move || if saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
