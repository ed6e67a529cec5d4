use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::entity::users::{ActiveModel, Column, Entity as Users, Model};

pub async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<Model>, DbErr> {
    Users::find().filter(Column::Email.eq(email)).one(conn).await
}

pub async fn exists_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<bool, DbErr> {
    Ok(Users::find().filter(Column::Email.eq(email)).count(conn).await? > 0)
}

pub async fn exists_by_username<C: ConnectionTrait>(conn: &C, username: &str) -> Result<bool, DbErr> {
    Ok(Users::find()
        .filter(Column::Username.eq(username))
        .count(conn)
        .await?
        > 0)
}

pub async fn insert<C: ConnectionTrait>(conn: &C, user: ActiveModel) -> Result<Model, DbErr> {
    user.insert(conn).await
}
