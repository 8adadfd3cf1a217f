pub(super) const GUIDE: &str = "\
kbgraph guide

The knowledge snapshot is a read-only SQLite catalog of resources, commands,
fields, flags, summaries and the precomputed links between them.

Start here:
  kbgraph search job                      search every kind for a token
  kbgraph resource jobs                   fields, relationships, summaries, commands
  kbgraph resources --query job           list resources by name
  kbgraph commands --resource jobs        commands linked to a resource
  kbgraph flags --command \"jobs list\"     flags of matching commands
  kbgraph neighbors jobs --limit 20       resources ranked by neighbor score
  kbgraph metapath jobs --kind filter_target
  kbgraph filters --command \"jobs list\"   multi-hop filter paths for one command

Names are forgiving: `job-site` resolves to `job-sites`, `transport-summary`
to `transport-summaries`. Rewrites are reported on stderr; an ambiguous or
unknown name fails with the closest matches.

Add --json to any command for machine-readable output. Lists accept --limit
and --offset.

The snapshot path comes from KBGRAPH_KNOWLEDGE_DB, then the default
cartographer_out/db/knowledge.sqlite. Set KBGRAPH_LOG=debug to trace queries.
";
