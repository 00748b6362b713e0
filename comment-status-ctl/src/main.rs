use std::rc::Rc;

use anyhow::{anyhow, Context};
use comment_status_client::{
    api::{CommentState, CommentThread, PullReqRef, ThreadId},
    ClientConfig, ControllerContext, HttpStatusApi, Labels, StatusBus, StatusController,
    ToggleOutcome, TracingNotifier,
};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Server url, defaults to `COMMENT_STATUS_HOST` then to the local server
    #[structopt(short, long)]
    host: Option<String>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Mark a comment thread resolved
    Resolve(ThreadArgs),

    /// Mark a comment thread active again
    Reactivate(ThreadArgs),

    /// Flip the status of a comment thread, whatever it currently is
    Toggle(ThreadArgs),

    /// Print a comment thread
    Show(ThreadArgs),

    /// Create an active comment thread
    Create {
        /// Repository path, eg. `space/repo`
        repo: String,

        /// Pull request number
        pr: i64,
    },

    /// Delete a comment thread, making its status immutable
    Delete(ThreadArgs),
}

#[derive(structopt::StructOpt)]
struct ThreadArgs {
    /// Repository path, eg. `space/repo`
    repo: String,

    /// Pull request number
    pr: i64,

    /// Comment thread id
    thread: i64,
}

impl ThreadArgs {
    fn split(self) -> (PullReqRef, ThreadId) {
        (PullReqRef::new(self.repo, self.pr), ThreadId(self.thread))
    }
}

async fn toggle(api: &HttpStatusApi, pr: PullReqRef, id: ThreadId) -> anyhow::Result<CommentThread> {
    let thread = api
        .find_thread(&pr, id)
        .await
        .with_context(|| format!("fetching thread {id} of {pr:?}"))?;
    let ctx = ControllerContext {
        api: Rc::new(api.clone()),
        bus: StatusBus::new(),
        notifier: Rc::new(TracingNotifier),
        labels: Rc::new(Labels::default()),
        locator: None,
    };
    let controller = StatusController::mount(pr, thread, ctx);
    match controller.toggle().await {
        ToggleOutcome::Applied(_) => Ok(controller.thread()),
        ToggleOutcome::Failed(message) => Err(anyhow!(message)),
        outcome => Err(anyhow!("thread {id} cannot be toggled: {outcome:?}")),
    }
}

fn print_thread(t: &CommentThread) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(t).context("serializing comment thread")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opt = <Opt as structopt::StructOpt>::from_args();

    let config = match opt.host {
        Some(host) => ClientConfig::new(host).context("parsing --host")?,
        None => ClientConfig::from_env()?,
    };
    let api = HttpStatusApi::new(&config);

    let thread = match opt.cmd {
        Command::Resolve(args) => {
            let (pr, id) = args.split();
            api.set_status(&pr, id, CommentState::Resolved)
                .await
                .with_context(|| format!("resolving thread {id} of {pr:?}"))?
        }
        Command::Reactivate(args) => {
            let (pr, id) = args.split();
            api.set_status(&pr, id, CommentState::Active)
                .await
                .with_context(|| format!("reactivating thread {id} of {pr:?}"))?
        }
        Command::Toggle(args) => {
            let (pr, id) = args.split();
            toggle(&api, pr, id).await?
        }
        Command::Show(args) => {
            let (pr, id) = args.split();
            api.find_thread(&pr, id)
                .await
                .with_context(|| format!("fetching thread {id} of {pr:?}"))?
        }
        Command::Create { repo, pr } => {
            let pr = PullReqRef::new(repo, pr);
            api.create_thread(&pr)
                .await
                .with_context(|| format!("creating a thread on {pr:?}"))?
        }
        Command::Delete(args) => {
            let (pr, id) = args.split();
            api.delete_thread(&pr, id)
                .await
                .with_context(|| format!("deleting thread {id} of {pr:?}"))?
        }
    };
    print_thread(&thread)
}
