use std::{
    io::{self, BufRead, Write},
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use async_trait::async_trait;
use todos_api::v1::{Todo, TodoId};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    api::{HttpApi, TodoApi},
    command::{Command, HELP},
    config::Config,
    error::{ControllerError, FormError},
    form::{Submission, TodoForm},
    list::{Confirm, Deletion, TodoList},
    state::LoadStatus,
    view,
};

type Submitted = Result<Todo, ControllerError>;

/// Lines typed on stdin, read on their own thread.
fn stdin_lines() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(16);

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });

    receiver
}

/// Yes/no questions asked by running commands.
///
/// While a question is waiting, the next typed line answers it instead of
/// being parsed as a command.
#[derive(Clone, Default)]
struct Prompts {
    waiting: Arc<Mutex<Option<oneshot::Sender<bool>>>>,
}

impl Prompts {
    /// Hand `line` to the waiting question, if there is one.
    fn answer(&self, line: &str) -> bool {
        let waiting = self
            .waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match waiting {
            Some(sender) => {
                let _ = sender.send(matches!(line.trim(), "y" | "Y" | "yes"));
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Confirm for Prompts {
    async fn confirm(&self, message: &str) -> bool {
        let (sender, answer) = oneshot::channel();

        // a question nobody answered yet is declined
        *self.waiting.lock().unwrap_or_else(PoisonError::into_inner) = Some(sender);

        print!("{message} [y/N] ");
        let _ = io::stdout().flush();

        answer.await.unwrap_or(false)
    }
}

pub async fn run(config: Config) -> eyre::Result<()> {
    let list = Arc::new(TodoList::new(
        HttpApi::new(&config.api_url),
        config.banner_timings(),
    ));
    let prompts = Prompts::default();
    let mut lines = stdin_lines();
    let (submitted, mut results) = mpsc::unbounded_channel();

    let mut changes = list.subscribe();
    tokio::spawn(async move {
        let mut shown = None;
        while changes.changed().await.is_ok() {
            let banner = changes.borrow_and_update().banner.clone();
            if banner != shown {
                if let Some(banner) = &banner {
                    println!("{}", view::banner(banner));
                }
                shown = banner;
            }
        }
    });

    println!("{}", view::list(&list.snapshot()));
    let _ = list.load().await;
    println!("{}", view::list(&list.snapshot()));

    if let LoadStatus::Failed(message) = list.snapshot().status {
        eyre::bail!("could not load todos: {message}");
    }

    let mut form = TodoForm::new();
    form.sync(&list.snapshot());

    loop {
        print!("{}> ", form.heading());
        let _ = io::stdout().flush();

        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                if prompts.answer(&line) {
                    continue;
                }

                form.sync(&list.snapshot());

                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };

                if command == Command::Quit {
                    break;
                }

                dispatch(&list, &mut form, Arc::new(prompts.clone()), &submitted, command);
            }
            Some(result) = results.recv() => finished(&list, &mut form, result),
        }

        form.sync(&list.snapshot());
    }

    Ok(())
}

/// Act on one command. Anything that talks to the backend runs on its own
/// task, which is returned; the prompt stays usable meanwhile.
fn dispatch<A: TodoApi + 'static>(
    list: &Arc<TodoList<A>>,
    form: &mut TodoForm,
    confirm: Arc<dyn Confirm>,
    submitted: &mpsc::UnboundedSender<Submitted>,
    command: Command,
) -> Option<JoinHandle<()>> {
    match command {
        Command::List => println!("{}", view::list(&list.snapshot())),
        Command::Help => println!("{HELP}"),
        Command::Title(title) => {
            form.set_title(title);
            print!("{}", view::form(form));
        }
        Command::Description(description) => {
            form.set_description(description);
            print!("{}", view::form(form));
        }
        Command::Submit => return submit(list, form, submitted),
        Command::Edit(position) => {
            let id = at(list, position)?;
            list.select_for_edit(&id);
            form.sync(&list.snapshot());
            print!("{}", view::form(form));
        }
        Command::Cancel => {
            form.cancel(list);
            print!("{}", view::form(form));
        }
        Command::Complete(position) => return set_completion(list, position, true),
        Command::Reopen(position) => return set_completion(list, position, false),
        Command::Delete(position) => {
            let id = at(list, position)?;
            let list = list.clone();

            return Some(tokio::spawn(async move {
                match list.delete(&id, confirm.as_ref()).await {
                    Ok(Deletion::Deleted) => println!("{}", view::list(&list.snapshot())),
                    Ok(Deletion::Declined) => {}
                    Err(err) => report(err),
                }
            }));
        }
        Command::Quit => {}
    }

    None
}

/// Start the form's submission. The result comes back through `submitted`
/// and is handed to [`finished`].
fn submit<A: TodoApi + 'static>(
    list: &Arc<TodoList<A>>,
    form: &mut TodoForm,
    submitted: &mpsc::UnboundedSender<Submitted>,
) -> Option<JoinHandle<()>> {
    let submission = match form.begin(&list.snapshot()) {
        Ok(submission) => submission,
        Err(FormError::EmptyTitle) => {
            print!("{}", view::form(form));
            return None;
        }
        Err(err) => {
            println!("{err}");
            return None;
        }
    };
    print!("{}", view::form(form));

    let list = list.clone();
    let submitted = submitted.clone();

    Some(tokio::spawn(async move {
        let result = match submission {
            Submission::Create(fields) => list.create(fields).await,
            Submission::Update(todo) => list.update(todo).await,
        };
        let _ = submitted.send(result);
    }))
}

fn finished<A: TodoApi>(list: &TodoList<A>, form: &mut TodoForm, result: Submitted) {
    form.finish(&result);
    form.sync(&list.snapshot());

    match result {
        Ok(_) => println!("{}", view::list(&list.snapshot())),
        Err(ControllerError::Api(_)) => print!("{}", view::form(form)),
        Err(err) => println!("{err}"),
    }
}

fn set_completion<A: TodoApi + 'static>(
    list: &Arc<TodoList<A>>,
    position: usize,
    completed: bool,
) -> Option<JoinHandle<()>> {
    let id = at(list, position)?;
    let list = list.clone();

    Some(tokio::spawn(async move {
        match list.set_completion(&id, completed).await {
            Ok(_) => println!("{}", view::list(&list.snapshot())),
            Err(err) => report(err),
        }
    }))
}

/// The id of the todo printed at `position`.
fn at<A: TodoApi>(list: &TodoList<A>, position: usize) -> Option<TodoId> {
    let state = list.snapshot();
    let id = position
        .checked_sub(1)
        .and_then(|index| state.sorted().get(index).map(|todo| todo.id.clone()));

    if id.is_none() {
        println!("there is no todo number {position}");
    }

    id
}

/// Api failures already show up as a banner, everything else is printed here.
fn report(err: ControllerError) {
    if !matches!(err, ControllerError::Api(_)) {
        println!("{err}");
    }
}
