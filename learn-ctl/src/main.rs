use std::io::Write;

use anyhow::Context;
use learn_client::{
    api::{
        CategoryId, CategoryPatch, CommentId, CommentPatch, Kind, Level, NewCategory, NewComment,
        NewSubject, NewTopic, SubjectId, SubjectPatch, SubtopicId, SubtopicPatch, TopicId,
        TopicPatch,
    },
    Analytics, Config, ContentTree, Dashboard, ExplorerMsg, HttpGateway, Removal, SubtopicForm,
    Table, Target, Update, Updated,
};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base url of the REST API
    #[structopt(long, env = "LEARN_API_BASE", default_value = "http://localhost:8000/api")]
    host: String,

    /// Bearer token sent with every request
    #[structopt(long, env = "LEARN_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Print the whole hierarchy
    Tree,

    /// Print totals, per-category rollups and the best covered subjects and topics
    Analytics {
        #[structopt(long)]
        json: bool,
    },

    /// Drill down into one category, subject and topic
    Explore {
        category: Option<String>,
        subject: Option<String>,
        topic: Option<String>,
    },

    /// List one level, optionally filtered by ancestors
    List {
        level: Level,

        #[structopt(long)]
        category: Option<String>,

        #[structopt(long)]
        subject: Option<String>,

        #[structopt(long)]
        topic: Option<String>,
    },

    CreateCategory {
        name: String,
        slug: String,

        #[structopt(long)]
        description: Option<String>,
    },

    CreateSubject {
        category: String,
        name: String,
        slug: String,

        #[structopt(long)]
        description: Option<String>,
    },

    CreateTopic {
        subject: String,
        title: String,
        slug: String,

        #[structopt(long)]
        description: Option<String>,
    },

    CreateSubtopic {
        topic: String,
        title: String,

        #[structopt(long, default_value = "")]
        content: String,
    },

    CreateComment {
        subtopic: String,
        text: String,
    },

    /// Change some fields of an existing entity
    Update {
        kind: Kind,
        id: String,

        #[structopt(long)]
        name: Option<String>,

        #[structopt(long)]
        title: Option<String>,

        #[structopt(long)]
        slug: Option<String>,

        #[structopt(long)]
        description: Option<String>,

        #[structopt(long)]
        content: Option<String>,

        #[structopt(long)]
        text: Option<String>,
    },

    /// Delete an entity and everything below it
    Delete {
        kind: Kind,
        id: String,

        /// Do not ask for confirmation
        #[structopt(long)]
        yes: bool,
    },
}

struct Fields {
    name: Option<String>,
    title: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    content: Option<String>,
    text: Option<String>,
}

impl Fields {
    fn into_update(self, kind: Kind, id: String) -> Update {
        match kind {
            Kind::Categories => Update::Category(
                CategoryId(id),
                CategoryPatch {
                    name: self.name,
                    slug: self.slug,
                    description: self.description,
                },
            ),
            Kind::Subjects => Update::Subject(
                SubjectId(id),
                SubjectPatch {
                    name: self.name,
                    slug: self.slug,
                    description: self.description,
                    category_id: None,
                },
            ),
            Kind::Topics => Update::Topic(
                TopicId(id),
                TopicPatch {
                    title: self.title,
                    slug: self.slug,
                    description: self.description,
                    subject_id: None,
                },
            ),
            Kind::Subtopics => Update::Subtopic(
                SubtopicId(id),
                SubtopicPatch {
                    title: self.title,
                    content: self.content,
                    topic_id: None,
                },
            ),
            Kind::Comments => Update::Comment(CommentId(id), CommentPatch { text: self.text }),
        }
    }
}

fn target(kind: Kind, id: String) -> Target {
    match kind {
        Kind::Categories => Target::Category(CategoryId(id)),
        Kind::Subjects => Target::Subject(SubjectId(id)),
        Kind::Topics => Target::Topic(TopicId(id)),
        Kind::Subtopics => Target::Subtopic(SubtopicId(id)),
        Kind::Comments => Target::Comment(CommentId(id)),
    }
}

fn ask(question: &str) -> bool {
    print!("{question} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn pad<S: AsRef<str>>(cells: impl Iterator<Item = S>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter().copied())
        .map(|(c, w)| format!("{:w$}", c.as_ref()))
        .collect::<Vec<_>>()
        .join("  ")
}

fn print_table(table: &Table) {
    println!("{}", table.title);
    let mut widths = table.columns.iter().map(|c| c.len()).collect::<Vec<_>>();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(cell.chars().count());
        }
    }
    println!("  {:36}  {}", "id", pad(table.columns.iter().copied(), &widths));
    for row in &table.rows {
        println!("  {:36}  {}", row.key, pad(row.cells.iter(), &widths));
    }
    if table.rows.is_empty() {
        println!("  (nothing here)");
    }
}

fn print_tree(tree: &ContentTree) {
    for c in tree.categories() {
        println!("{} [{}] ({})", c.name, c.slug, c.id);
        for s in &c.subjects {
            println!("  {} [{}] ({})", s.name, s.slug, s.id);
            for t in &s.topics {
                println!("    {} [{}] ({})", t.title, t.slug, t.id);
                for st in &t.subtopics {
                    println!(
                        "      {} ({}) +{} -{}, {} comments",
                        st.title,
                        st.id,
                        st.likes,
                        st.dislikes,
                        st.comments.len()
                    );
                }
            }
        }
    }
}

fn print_analytics(a: &Analytics) {
    let t = &a.totals;
    println!(
        "{} categories, {} subjects, {} topics, {} subtopics",
        t.categories, t.subjects, t.topics, t.subtopics
    );
    println!();
    println!("Per category:");
    for c in &a.categories {
        println!(
            "  {}: {} subjects, {} topics, {} subtopics",
            c.name, c.subjects, c.topics, c.subtopics
        );
    }
    println!();
    println!("Subjects with most content:");
    for s in &a.top_subjects {
        println!(
            "  {} ({}): {} subtopics in {} topics",
            s.name, s.category, s.subtopics, s.topics
        );
    }
    println!();
    println!("Topics with most content:");
    for t in &a.top_topics {
        println!(
            "  {} ({} / {}): {} subtopics",
            t.title, t.category, t.subject, t.subtopics
        );
    }
}

fn print_updated(updated: &Updated) {
    match updated {
        Updated::Category(c) => println!("updated category {} ({})", c.name, c.id),
        Updated::Subject(s) => println!("updated subject {} ({})", s.name, s.id),
        Updated::Topic(t) => println!("updated topic {} ({})", t.title, t.id),
        Updated::Subtopic(st) => println!("updated subtopic {} ({})", st.title, st.id),
        Updated::Comment(c) => println!("updated comment {}", c.id),
    }
}

async fn run(opt: Opt) -> Result<(), learn_client::Error> {
    let config = Config::new(&opt.host, opt.token.as_deref());
    tracing::debug!(base = %config.base, authenticated = config.token.is_some(), "connecting");
    let mut d = Dashboard::new(HttpGateway::new(config));
    d.refresh().await?;

    match opt.cmd {
        Command::Tree => print_tree(d.tree()),
        Command::Analytics { json } => {
            if json {
                let out = serde_json::to_string_pretty(d.analytics())
                    .context("serializing analytics")?;
                println!("{out}");
            } else {
                print_analytics(d.analytics());
            }
        }
        Command::Explore {
            category,
            subject,
            topic,
        } => {
            if let Some(c) = category {
                d.explore(ExplorerMsg::OpenCategory(CategoryId(c)));
            }
            if let Some(s) = subject {
                d.explore(ExplorerMsg::OpenSubject(SubjectId(s)));
            }
            if let Some(t) = topic {
                d.explore(ExplorerMsg::OpenTopic(TopicId(t)));
            }
            print_table(&d.explorer().table(d.tree()));
        }
        Command::List {
            level,
            category,
            subject,
            topic,
        } => {
            d.set_tab(level);
            d.select_category(category.map(CategoryId));
            d.select_subject(subject.map(SubjectId));
            d.select_topic(topic.map(TopicId));
            print_table(&d.section());
        }
        Command::CreateCategory {
            name,
            slug,
            description,
        } => {
            let c = d
                .create_category(NewCategory {
                    name,
                    slug,
                    description,
                })
                .await?;
            println!("{}", c.id);
        }
        Command::CreateSubject {
            category,
            name,
            slug,
            description,
        } => {
            let s = d
                .create_subject(NewSubject {
                    name,
                    slug,
                    description,
                    category_id: CategoryId(category),
                })
                .await?;
            println!("{}", s.id);
        }
        Command::CreateTopic {
            subject,
            title,
            slug,
            description,
        } => {
            let t = d
                .create_topic(NewTopic {
                    title,
                    slug,
                    description,
                    subject_id: SubjectId(subject),
                })
                .await?;
            println!("{}", t.id);
        }
        Command::CreateSubtopic {
            topic,
            title,
            content,
        } => {
            d.select_topic(Some(TopicId(topic)));
            let st = d.create_subtopic(SubtopicForm { title, content }).await?;
            println!("{}", st.id);
        }
        Command::CreateComment { subtopic, text } => {
            let c = d
                .create_comment(NewComment {
                    subtopic_id: SubtopicId(subtopic),
                    text,
                })
                .await?;
            println!("{}", c.id);
        }
        Command::Update {
            kind,
            id,
            name,
            title,
            slug,
            description,
            content,
            text,
        } => {
            let fields = Fields {
                name,
                title,
                slug,
                description,
                content,
                text,
            };
            let updated = d.update(fields.into_update(kind, id)).await?;
            print_updated(&updated);
        }
        Command::Delete { kind, id, yes } => {
            match d.remove(target(kind, id), |q| yes || ask(q)).await? {
                Removal::Removed => println!("deleted"),
                Removal::Declined => println!("nothing deleted"),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    if let Err(err) = run(opt).await {
        eprintln!("{}", err.message());
        std::process::exit(1);
    }

    Ok(())
}
