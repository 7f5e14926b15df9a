use super::{DbConnection, error, util::BoxedDieselExpression};

pub mod measurement;
pub mod station;

trait AsDieselFilter<QuerySource> {
    fn as_diesel_filter<'a>(&'a self) -> Option<BoxedDieselExpression<'a, QuerySource>>
    where
        QuerySource: 'a;
}

pub trait FetchAll: Sized {
    fn fetch_all(
        db_conn: &mut DbConnection,
    ) -> impl Future<Output = error::Result<Vec<Self>>> + Send;
}

pub trait FetchByQuery: Sized {
    type QueryParams;

    fn fetch_by_query(
        query: &Self::QueryParams,
        db_conn: &mut DbConnection,
    ) -> impl Future<Output = error::Result<Vec<Self>>> + Send;
}
